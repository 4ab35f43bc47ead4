//! # Indicator Engine
//!
//! Technical indicators computed from a close series. Every series returned
//! here is aligned index-for-index with its input; positions inside an
//! indicator's warm-up window hold `None` ("not available") and are never
//! filled with a placeholder number.
//!
//! | Indicator | First value at index | Minimum closes |
//! |-----------|----------------------|----------------|
//! | RSI(14) | 13 | 14 |
//! | MACD(12, 26) | 25 | 26 |
//! | MACD signal(9) | 33 | 34 |
//! | SMA(50) | 49 | 50 |
//! | SMA(200) | 199 | 200 |

use serde::{Deserialize, Serialize};

use crate::{BarSeries, UtcDateTime, ValidationError};

/// Indicator windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ma_fast: usize,
    pub ma_slow: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_window: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ma_fast: 50,
            ma_slow: 200,
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let windows = [
            ("rsi_window", self.rsi_window),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("ma_fast", self.ma_fast),
            ("ma_slow", self.ma_slow),
        ];
        for (name, window) in windows {
            if window == 0 {
                return Err(ValidationError::ZeroWindow { name });
            }
        }

        if self.macd_fast >= self.macd_slow {
            return Err(ValidationError::WindowOrder {
                name: "macd",
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }
        if self.ma_fast >= self.ma_slow {
            return Err(ValidationError::WindowOrder {
                name: "moving_average",
                fast: self.ma_fast,
                slow: self.ma_slow,
            });
        }
        Ok(())
    }
}

/// Indicator identifiers used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Rsi,
    Macd,
    MacdSignal,
    MaFast,
    MaSlow,
}

impl IndicatorKind {
    pub const ALL: [Self; 5] = [
        Self::Rsi,
        Self::Macd,
        Self::MacdSignal,
        Self::MaFast,
        Self::MaSlow,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::MacdSignal => "macd_signal",
            Self::MaFast => "ma_fast",
            Self::MaSlow => "ma_slow",
        }
    }
}

/// Latest value of each indicator; `None` when not available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub ma_fast: Option<f64>,
    pub ma_slow: Option<f64>,
}

/// Full indicator columns aligned with the bar timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub settings: IndicatorSettings,
    pub timestamps: Vec<UtcDateTime>,
    pub close: Vec<f64>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub ma_fast: Vec<Option<f64>>,
    pub ma_slow: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn compute(series: &BarSeries, settings: &IndicatorSettings) -> Self {
        Self::from_closes(series.timestamps(), series.closes(), settings)
    }

    pub fn from_closes(
        timestamps: Vec<UtcDateTime>,
        closes: Vec<f64>,
        settings: &IndicatorSettings,
    ) -> Self {
        let rsi = rsi(&closes, settings.rsi_window);
        let (macd, macd_signal) = macd(
            &closes,
            settings.macd_fast,
            settings.macd_slow,
            settings.macd_signal,
        );
        let ma_fast = sma(&closes, settings.ma_fast);
        let ma_slow = sma(&closes, settings.ma_slow);

        Self {
            settings: *settings,
            timestamps,
            close: closes,
            rsi,
            macd,
            macd_signal,
            ma_fast,
            ma_slow,
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn column(&self, kind: IndicatorKind) -> &[Option<f64>] {
        match kind {
            IndicatorKind::Rsi => &self.rsi,
            IndicatorKind::Macd => &self.macd,
            IndicatorKind::MacdSignal => &self.macd_signal,
            IndicatorKind::MaFast => &self.ma_fast,
            IndicatorKind::MaSlow => &self.ma_slow,
        }
    }

    /// Values at the last bar.
    pub fn latest(&self) -> IndicatorSnapshot {
        self.snapshot_at(self.len().saturating_sub(1))
    }

    /// Values at `index`; all `None` when out of range.
    pub fn snapshot_at(&self, index: usize) -> IndicatorSnapshot {
        let at = |column: &[Option<f64>]| column.get(index).copied().flatten();
        IndicatorSnapshot {
            rsi: at(&self.rsi),
            macd: at(&self.macd),
            macd_signal: at(&self.macd_signal),
            ma_fast: at(&self.ma_fast),
            ma_slow: at(&self.ma_slow),
        }
    }

    /// Indicators with at least one value.
    pub fn available(&self) -> Vec<IndicatorKind> {
        IndicatorKind::ALL
            .into_iter()
            .filter(|kind| self.column(*kind).iter().any(Option::is_some))
            .collect()
    }

    /// Indicators withheld because the history is shorter than their window.
    pub fn withheld(&self) -> Vec<IndicatorKind> {
        IndicatorKind::ALL
            .into_iter()
            .filter(|kind| self.column(*kind).iter().all(Option::is_none))
            .collect()
    }
}

/// Wilder relative strength index.
///
/// The first change is taken as zero, so the first value appears once
/// `window` closes exist. A flat window reports 50; a window without losses
/// reports 100.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 || closes.len() < window {
        return out;
    }

    let alpha = 1.0 / window as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 0..closes.len() {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain += alpha * (gain - avg_gain);
            avg_loss += alpha * (loss - avg_loss);
        }

        if i + 1 >= window {
            out[i] = Some(rsi_value(avg_gain, avg_loss));
        }
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 {
        if avg_gain <= 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
    }
}

/// Exponential moving average with `alpha = 2 / (span + 1)`, seeded with the
/// first available input. Leading `None` inputs are skipped; output becomes
/// available once `span` inputs have been consumed.
pub fn ema(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if span == 0 {
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut current: Option<f64> = None;
    let mut seen = 0_usize;

    for (i, value) in values.iter().enumerate() {
        let Some(value) = *value else {
            continue;
        };
        let next = match current {
            None => value,
            Some(previous) => previous + alpha * (value - previous),
        };
        current = Some(next);
        seen += 1;
        if seen >= span {
            out[i] = Some(next);
        }
    }

    out
}

/// MACD line (`EMA(fast) - EMA(slow)`) and its signal line (`EMA(signal)` of
/// the MACD line).
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let inputs = closes.iter().copied().map(Some).collect::<Vec<_>>();
    let fast_ema = ema(&inputs, fast);
    let slow_ema = ema(&inputs, slow);

    let line = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(fast, slow)| match (fast, slow) {
            (Some(fast), Some(slow)) => Some(fast - slow),
            _ => None,
        })
        .collect::<Vec<_>>();
    let signal_line = ema(&line, signal);

    (line, signal_line)
}

/// Trailing simple moving average.
pub fn sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 || closes.len() < window {
        return out;
    }

    let mut sum: f64 = closes[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);
    for i in window..closes.len() {
        sum += closes[i] - closes[i - window];
        out[i] = Some(sum / window as f64);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value should be available");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn sma_warms_up_then_tracks_window() {
        let values = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(values[..2], [None, None]);
        assert_close(values[2], 2.0);
        assert_close(values[3], 3.0);
        assert_close(values[4], 4.0);
    }

    #[test]
    fn sma_shorter_than_window_is_unavailable() {
        assert!(sma(&[1.0, 2.0], 3).iter().all(Option::is_none));
    }

    #[test]
    fn ema_is_seeded_with_first_value() {
        let inputs = [Some(10.0), Some(11.0), Some(12.0)];
        let values = ema(&inputs, 3);
        assert_eq!(values[..2], [None, None]);
        // alpha = 0.5: 10 -> 10.5 -> 11.25
        assert_close(values[2], 11.25);
    }

    #[test]
    fn ema_skips_leading_gaps() {
        let inputs = [None, None, Some(4.0), Some(6.0)];
        let values = ema(&inputs, 2);
        assert_eq!(values[..3], [None, None, None]);
        assert_close(values[3], 4.0 + (2.0 / 3.0) * 2.0);
    }

    #[test]
    fn rsi_first_value_needs_full_window() {
        let closes = (0..14).map(|i| 100.0 + f64::from(i % 3)).collect::<Vec<_>>();
        let values = rsi(&closes, 14);
        assert!(values[..13].iter().all(Option::is_none));
        let first = values[13].expect("first value available at N = 14");
        assert!((0.0..=100.0).contains(&first));

        assert!(rsi(&closes[..13], 14).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_of_only_gains_is_100_and_only_losses_is_0() {
        let rising = (0..20).map(f64::from).collect::<Vec<_>>();
        assert_close(*rsi(&rising, 14).last().expect("non-empty"), 100.0);

        let falling = (0..20).map(|i| 100.0 - f64::from(i)).collect::<Vec<_>>();
        assert_close(*rsi(&falling, 14).last().expect("non-empty"), 0.0);
    }

    #[test]
    fn macd_line_and_signal_warm_up_separately() {
        let closes = (0..40).map(|i| 50.0 + f64::from(i) * 0.5).collect::<Vec<_>>();
        let (line, signal) = macd(&closes, 12, 26, 9);

        assert!(line[..25].iter().all(Option::is_none));
        assert!(line[25].is_some());
        assert!(signal[..33].iter().all(Option::is_none));
        assert!(signal[33].is_some());
    }

    #[test]
    fn settings_reject_zero_and_inverted_windows() {
        let zero = IndicatorSettings {
            rsi_window: 0,
            ..IndicatorSettings::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ValidationError::ZeroWindow { name: "rsi_window" })
        ));

        let inverted = IndicatorSettings {
            ma_fast: 200,
            ma_slow: 50,
            ..IndicatorSettings::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ValidationError::WindowOrder { .. })
        ));
        assert!(IndicatorSettings::default().validate().is_ok());
    }

    #[test]
    fn short_history_withholds_long_windows() {
        let closes = (0..60).map(|i| 10.0 + f64::from(i)).collect::<Vec<_>>();
        let timestamps = (0..60)
            .map(|i| UtcDateTime::from_unix_seconds(1_704_067_200 + i * 86_400).expect("ts"))
            .collect();
        let series = IndicatorSeries::from_closes(timestamps, closes, &IndicatorSettings::default());

        assert_eq!(series.withheld(), vec![IndicatorKind::MaSlow]);
        assert_eq!(series.available().len(), 4);
        let latest = series.latest();
        assert!(latest.rsi.is_some());
        assert!(latest.ma_fast.is_some());
        assert!(latest.ma_slow.is_none());
    }
}
