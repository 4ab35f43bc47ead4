use serde::{Deserialize, Serialize};

use crate::{Interval, Symbol, UtcDateTime, ValidationError};

/// OHLCV bar for a single period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PriceBar {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Row as delivered by a provider, any field possibly missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawBar {
    pub ts: Option<i64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    fn into_bar(self) -> Option<Result<PriceBar, ValidationError>> {
        let (ts, open, high, low, close) =
            (self.ts?, self.open?, self.high?, self.low?, self.close?);
        let ts = match UtcDateTime::from_unix_seconds(ts) {
            Ok(ts) => ts,
            Err(error) => return Some(Err(error)),
        };
        Some(PriceBar::new(ts, open, high, low, close, self.volume))
    }
}

/// Time-ordered bars for one symbol and interval.
///
/// Bars are strictly increasing in time; duplicate timestamps never survive
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub symbol: Symbol,
    pub interval: Interval,
    bars: Vec<PriceBar>,
    #[serde(skip)]
    dropped: RawDropStats,
}

impl BarSeries {
    /// Builds a series from validated bars, sorting them and keeping the last
    /// bar seen for any repeated timestamp.
    pub fn new(symbol: Symbol, interval: Interval, bars: Vec<PriceBar>) -> Self {
        let mut bars = bars;
        bars.sort_by_key(|bar| bar.ts);

        let mut ordered: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match ordered.last_mut() {
                Some(last) if last.ts == bar.ts => *last = bar,
                _ => ordered.push(bar),
            }
        }

        Self {
            symbol,
            interval,
            bars: ordered,
            dropped: RawDropStats::default(),
        }
    }

    /// Builds a series from provider rows. Rows missing any OHLC field or the
    /// timestamp are dropped; rows that are present but invalid are dropped and
    /// counted.
    pub fn from_raw(symbol: Symbol, interval: Interval, rows: Vec<RawBar>) -> (Self, RawDropStats) {
        let mut stats = RawDropStats::default();
        let mut bars = Vec::with_capacity(rows.len());

        for row in rows {
            match row.into_bar() {
                None => stats.incomplete += 1,
                Some(Err(_)) => stats.invalid += 1,
                Some(Ok(bar)) => bars.push(bar),
            }
        }

        let received = bars.len();
        let mut series = Self::new(symbol, interval, bars);
        stats.duplicates = received - series.len();
        series.dropped = stats;
        (series, stats)
    }

    /// Provider rows left out when the series was built with [`Self::from_raw`].
    pub fn dropped(&self) -> RawDropStats {
        self.dropped
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn timestamps(&self) -> Vec<UtcDateTime> {
        self.bars.iter().map(|bar| bar.ts).collect()
    }
}

/// Counts of provider rows that did not make it into a [`BarSeries`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RawDropStats {
    pub incomplete: usize,
    pub invalid: usize,
    pub duplicates: usize,
}

impl RawDropStats {
    pub const fn total(self) -> usize {
        self.incomplete + self.invalid + self.duplicates
    }
}

impl std::fmt::Display for RawDropStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} incomplete, {} invalid, {} duplicate",
            self.incomplete, self.invalid, self.duplicates
        )
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
