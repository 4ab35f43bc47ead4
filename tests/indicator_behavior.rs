//! Behavior-driven tests for the indicator engine
//!
//! These tests verify warm-up handling: indicators are withheld, never
//! padded, until their lookback window of closes exists.

use ferrosignal_core::indicators::{ema, macd, rsi, sma};
use ferrosignal_core::{
    BarSeries, IndicatorKind, IndicatorSeries, IndicatorSettings, Interval, PriceBar, Symbol,
    SyntheticSource, SyntheticTrend, UtcDateTime,
};

fn series_from_closes(closes: &[f64]) -> BarSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let ts = UtcDateTime::from_unix_seconds(1_700_000_000 + i as i64 * 86_400)
                .expect("valid ts");
            PriceBar::new(ts, *close, *close, *close, *close, Some(1_000)).expect("valid bar")
        })
        .collect();
    BarSeries::new(Symbol::parse("IUSA.L").expect("symbol"), Interval::OneDay, bars)
}

// =============================================================================
// Indicators: Warm-up
// =============================================================================

#[test]
fn when_history_is_shorter_than_rsi_window_system_withholds_rsi() {
    // Given: 13 closes
    let closes = (0..13).map(|i| 100.0 + f64::from(i)).collect::<Vec<_>>();

    // When: RSI(14) is computed
    let values = rsi(&closes, 14);

    // Then: every value is "not available"
    assert_eq!(values.len(), 13);
    assert!(values.iter().all(Option::is_none));
}

#[test]
fn when_history_reaches_rsi_window_system_reports_bounded_value() {
    // Given: 14 noisy closes
    let closes = [
        100.0, 101.5, 99.2, 98.7, 102.3, 103.0, 101.1, 100.4, 99.9, 104.2, 103.8, 102.2, 105.0,
        104.1,
    ];

    // When: RSI(14) is computed
    let values = rsi(&closes, 14);

    // Then: the first value appears at index 13 and lies in [0, 100]
    let first = values[13].expect("available at N = 14");
    assert!((0.0..=100.0).contains(&first), "rsi out of range: {first}");
}

#[test]
fn when_closes_are_flat_system_reports_neutral_rsi_and_zero_macd() {
    // Given: 60 identical closes
    let closes = vec![42.0; 60];

    // When: indicators are computed
    let rsi_values = rsi(&closes, 14);
    let (line, signal) = macd(&closes, 12, 26, 9);

    // Then: RSI is exactly 50 and MACD/signal are exactly 0
    assert_eq!(rsi_values.last().copied().flatten(), Some(50.0));
    assert_eq!(line.last().copied().flatten(), Some(0.0));
    assert_eq!(signal.last().copied().flatten(), Some(0.0));
}

#[test]
fn when_computing_ema_system_reports_from_span_minus_one() {
    let inputs = (1..=5).map(|i| Some(f64::from(i))).collect::<Vec<_>>();
    let values = ema(&inputs, 3);

    assert_eq!(values.iter().position(Option::is_some), Some(2));
}

#[test]
fn when_computing_sma_system_averages_trailing_window() {
    let values = sma(&[2.0, 4.0, 6.0, 8.0], 2);
    assert_eq!(values, vec![None, Some(3.0), Some(5.0), Some(7.0)]);
}

// =============================================================================
// Indicators: Series over a price table
// =============================================================================

#[test]
fn when_table_has_sixty_bars_system_withholds_only_slow_average() {
    // Given: a 60-bar table
    let closes = (0..60).map(|i| 50.0 + f64::from(i) * 0.25).collect::<Vec<_>>();
    let table = series_from_closes(&closes);

    // When: the indicator series is computed with default windows
    let series = IndicatorSeries::compute(&table, &IndicatorSettings::default());

    // Then: columns stay aligned with the bars and only MA200 is withheld
    assert_eq!(series.len(), 60);
    assert_eq!(series.timestamps, table.timestamps());
    assert_eq!(series.rsi.len(), 60);
    assert_eq!(series.ma_slow.len(), 60);
    assert_eq!(series.withheld(), vec![IndicatorKind::MaSlow]);
    assert!(series.latest().ma_slow.is_none());
    assert!(series.latest().ma_fast.is_some());
}

#[test]
fn when_table_has_twenty_bars_system_withholds_macd_and_averages() {
    let closes = (0..20).map(|i| 10.0 + f64::from(i % 4)).collect::<Vec<_>>();
    let series = IndicatorSeries::compute(&series_from_closes(&closes), &IndicatorSettings::default());

    assert_eq!(series.available(), vec![IndicatorKind::Rsi]);
    assert_eq!(
        series.withheld(),
        vec![
            IndicatorKind::Macd,
            IndicatorKind::MacdSignal,
            IndicatorKind::MaFast,
            IndicatorKind::MaSlow
        ]
    );
}

#[test]
fn when_synthetic_history_is_long_system_produces_every_indicator() {
    // Given: 250 synthetic daily bars
    let symbol = Symbol::parse("IUSA.L").expect("symbol");
    let table = SyntheticSource::new(SyntheticTrend::Rising(0.002)).generate(&symbol, Interval::OneDay, 250);

    // When: indicators are computed
    let series = IndicatorSeries::compute(&table, &IndicatorSettings::default());

    // Then: nothing is withheld and every latest value is finite
    assert!(series.withheld().is_empty());
    let latest = series.latest();
    for value in [latest.rsi, latest.macd, latest.macd_signal, latest.ma_fast, latest.ma_slow] {
        assert!(value.expect("available").is_finite());
    }
}
