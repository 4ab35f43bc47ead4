use std::future::Future;
use std::pin::Pin;

use crate::data_source::{BarsRequest, PriceSource, ProviderId, SourceError};
use crate::{BarSeries, Interval, LookbackPeriod, PriceBar, Symbol, UtcDateTime};

const MAX_SYNTHETIC_BARS: usize = 2_000;
/// 2024-01-01T00:00:00Z, anchor for generated timestamps.
const EPOCH_ANCHOR: i64 = 1_704_067_200;

/// Shape of the generated close series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntheticTrend {
    /// Constant close.
    Flat,
    /// Compounding growth per bar, e.g. `0.002` for +0.2%.
    Rising(f64),
    /// Compounding decline per bar.
    Falling(f64),
    /// Sine wave around the base price.
    Oscillating { amplitude: f64, period: usize },
}

/// Deterministic offline price source.
///
/// The base price is derived from the symbol so that different tickers get
/// different but reproducible series.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    trend: SyntheticTrend,
    bar_count: Option<usize>,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            trend: SyntheticTrend::Oscillating {
                amplitude: 0.04,
                period: 90,
            },
            bar_count: None,
        }
    }
}

impl SyntheticSource {
    pub fn new(trend: SyntheticTrend) -> Self {
        Self {
            trend,
            bar_count: None,
        }
    }

    /// Pins the number of generated bars instead of deriving it from the period.
    pub fn with_bar_count(mut self, bar_count: usize) -> Self {
        self.bar_count = Some(bar_count);
        self
    }

    pub fn generate(&self, symbol: &Symbol, interval: Interval, count: usize) -> BarSeries {
        let base = base_price(symbol);
        let step = interval.seconds();
        let start = EPOCH_ANCHOR - step * count as i64;

        let bars = (0..count)
            .filter_map(|i| {
                let close = self.close_at(base, i);
                let open = if i == 0 { close } else { self.close_at(base, i - 1) };
                let spread = close.max(open) * 0.002;
                let ts = UtcDateTime::from_unix_seconds(start + step * i as i64).ok()?;
                PriceBar::new(
                    ts,
                    open,
                    close.max(open) + spread,
                    (close.min(open) - spread).max(0.0),
                    close,
                    Some(10_000 + (i as u64 % 7) * 1_000),
                )
                .ok()
            })
            .collect();

        BarSeries::new(symbol.clone(), interval, bars)
    }

    fn close_at(&self, base: f64, index: usize) -> f64 {
        match self.trend {
            SyntheticTrend::Flat => base,
            SyntheticTrend::Rising(rate) => base * (1.0 + rate).powi(index as i32),
            SyntheticTrend::Falling(rate) => base * (1.0 - rate).powi(index as i32),
            SyntheticTrend::Oscillating { amplitude, period } => {
                let phase = index as f64 / period.max(1) as f64 * std::f64::consts::TAU;
                base * (1.0 + amplitude * phase.sin())
            }
        }
    }

    fn count_for(&self, interval: Interval, period: LookbackPeriod) -> usize {
        if let Some(count) = self.bar_count {
            return count;
        }

        let days = period.approx_days().unwrap_or(3_650) as usize;
        let trading_days = days * 5 / 7;
        let per_day = match interval {
            Interval::OneMinute => 510,
            Interval::FiveMinutes => 102,
            Interval::FifteenMinutes => 34,
            Interval::OneHour => 9,
            Interval::OneDay => 1,
            Interval::OneWeek => return (days / 7).clamp(1, MAX_SYNTHETIC_BARS),
        };
        (trading_days * per_day).clamp(1, MAX_SYNTHETIC_BARS)
    }
}

impl PriceSource for SyntheticSource {
    fn id(&self) -> ProviderId {
        ProviderId::Synthetic
    }

    fn bars<'a>(
        &'a self,
        req: BarsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let count = self.count_for(req.interval, req.period);
            let series = self.generate(&req.symbol, req.interval, count);
            if series.is_empty() {
                return Err(SourceError::no_data(format!(
                    "synthetic source produced no bars for {}",
                    req.symbol
                )));
            }
            Ok(series)
        })
    }
}

fn base_price(symbol: &Symbol) -> f64 {
    let seed = symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(u64::from(byte))
    });
    40.0 + (seed % 600) as f64 / 10.0
}
