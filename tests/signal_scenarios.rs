//! Behavior-driven tests for the signal decision
//!
//! End-to-end scenarios from closing prices (or indicator snapshots) to a
//! BUY / SELL / HOLD action.

use ferrosignal_core::signal::{combined_signal, decide, technical_signal};
use ferrosignal_core::{
    Action, DecisionPreset, DecisionSettings, IndicatorSeries, IndicatorSettings,
    IndicatorSnapshot, SentimentGate, SentimentLabel, SentimentSummary, TechnicalSignal,
    Thresholds, UtcDateTime,
};

fn indicators_for(closes: Vec<f64>) -> IndicatorSeries {
    let timestamps = (0..closes.len())
        .map(|i| UtcDateTime::from_unix_seconds(1_700_000_000 + i as i64 * 3_600).expect("ts"))
        .collect();
    IndicatorSeries::from_closes(timestamps, closes, &IndicatorSettings::default())
}

fn sentiment(score: f64, trigger_count: usize) -> SentimentSummary {
    SentimentSummary {
        score,
        label: SentimentLabel::from_score(score),
        trigger_count,
        samples: Vec::new(),
        pages_attempted: 5,
        pages_failed: 0,
    }
}

fn oversold_cross() -> IndicatorSnapshot {
    IndicatorSnapshot {
        rsi: Some(25.0),
        macd: Some(1.0),
        macd_signal: Some(0.5),
        ma_fast: None,
        ma_slow: None,
    }
}

// =============================================================================
// Scenario A: flat market
// =============================================================================

#[test]
fn when_prices_are_constant_system_holds() {
    // Given: 300 identical closes
    let series = indicators_for(vec![100.0; 300]);

    // When: the latest snapshot is evaluated
    let snapshot = series.latest();

    // Then: RSI is 50, MACD and signal are 0, both averages equal the price
    assert_eq!(snapshot.rsi, Some(50.0));
    assert_eq!(snapshot.macd, Some(0.0));
    assert_eq!(snapshot.macd_signal, Some(0.0));
    assert_eq!(snapshot.ma_fast, Some(100.0));
    assert_eq!(snapshot.ma_slow, Some(100.0));
    assert_eq!(
        technical_signal(&snapshot, &Thresholds::default()),
        TechnicalSignal::Hold
    );
}

// =============================================================================
// Scenario B: steady uptrend
// =============================================================================

#[test]
fn when_prices_rise_steadily_system_reports_momentum_once_slow_average_exists() {
    // Given: 300 closes growing 1% per bar
    let closes = (0..300).map(|i| 100.0 * 1.01_f64.powi(i)).collect::<Vec<_>>();
    let series = indicators_for(closes);
    let thresholds = Thresholds::default();

    // When: the latest snapshot is evaluated
    let latest = series.latest();

    // Then: RSI is not oversold, MACD leads its signal, MA50 is above MA200
    let rsi = latest.rsi.expect("rsi");
    assert!(rsi >= 30.0);
    assert!(latest.macd.expect("macd") > latest.macd_signal.expect("signal"));
    assert!(latest.ma_fast.expect("ma50") > latest.ma_slow.expect("ma200"));
    assert_eq!(technical_signal(&latest, &thresholds), TechnicalSignal::BuyMomentum);

    // And: before 200 bars exist the momentum rule is skipped
    let early = series.snapshot_at(150);
    assert!(early.ma_slow.is_none());
    assert_eq!(technical_signal(&early, &thresholds), TechnicalSignal::Hold);
    assert_eq!(
        technical_signal(&series.snapshot_at(199), &thresholds),
        TechnicalSignal::BuyMomentum
    );
}

// =============================================================================
// Scenarios C and D: oversold cross gated by sentiment
// =============================================================================

#[test]
fn when_oversold_cross_meets_positive_sentiment_system_buys() {
    // Given: RSI 25, MACD 1.0 over signal 0.5, score 0.3 with no triggers
    let snapshot = oversold_cross();

    // When: the combined preset decides
    let decision = decide(&snapshot, Some(&sentiment(0.3, 0)), &DecisionSettings::default());

    // Then: the action is BUY
    assert_eq!(decision.technical, TechnicalSignal::Buy);
    assert_eq!(decision.action, Action::Buy);
    assert_eq!(decision.preset, DecisionPreset::Combined);
}

#[test]
fn when_oversold_cross_meets_negative_sentiment_system_sells() {
    // Given: the same indicators with score -0.25
    let snapshot = oversold_cross();

    // When: the combined preset decides
    let decision = decide(&snapshot, Some(&sentiment(-0.25, 0)), &DecisionSettings::default());

    // Then: the negative score overrides the technical buy
    assert_eq!(decision.technical, TechnicalSignal::Buy);
    assert_eq!(decision.action, Action::Sell);
}

#[test]
fn when_no_headlines_were_collected_system_cannot_buy_on_sentiment() {
    let empty = SentimentSummary::empty();
    assert_eq!(empty.score, 0.0);
    assert_eq!(empty.trigger_count, 0);

    for technical in [TechnicalSignal::Buy, TechnicalSignal::BuyMomentum] {
        assert_ne!(
            combined_signal(technical, &empty, &SentimentGate::default()),
            Action::Buy
        );
    }
    assert_eq!(
        decide(&oversold_cross(), None, &DecisionSettings::default()).action,
        Action::Hold
    );
}

#[test]
fn when_two_headlines_trigger_system_sells_regardless_of_score() {
    let action = combined_signal(
        TechnicalSignal::BuyMomentum,
        &sentiment(0.6, 2),
        &SentimentGate::default(),
    );
    assert_eq!(action, Action::Sell);
}

#[test]
fn when_preset_is_confirmed_system_requires_agreeing_sentiment_sign() {
    let settings = DecisionSettings {
        preset: DecisionPreset::Confirmed,
        ..DecisionSettings::default()
    };

    assert_eq!(
        decide(&oversold_cross(), Some(&sentiment(0.05, 0)), &settings).action,
        Action::Buy
    );
    assert_eq!(
        decide(&oversold_cross(), Some(&sentiment(-0.25, 0)), &settings).action,
        Action::Hold
    );
}

// =============================================================================
// Single-rule presets
// =============================================================================

fn settings(preset: DecisionPreset) -> DecisionSettings {
    DecisionSettings {
        preset,
        ..DecisionSettings::default()
    }
}

#[test]
fn when_preset_is_rsi_macd_system_ignores_momentum() {
    // Given: neutral RSI, MACD above signal, MA50 above MA200
    let snapshot = IndicatorSnapshot {
        rsi: Some(50.0),
        macd: Some(1.0),
        macd_signal: Some(0.5),
        ma_fast: Some(110.0),
        ma_slow: Some(100.0),
    };

    // When: the technical and rsi_macd presets decide
    let technical = decide(&snapshot, None, &settings(DecisionPreset::Technical));
    let rsi_macd = decide(&snapshot, None, &settings(DecisionPreset::RsiMacd));

    // Then: only the full technical table buys on momentum
    assert_eq!(technical.action, Action::Buy);
    assert_eq!(rsi_macd.technical, TechnicalSignal::BuyMomentum);
    assert_eq!(rsi_macd.action, Action::Hold);
    assert_eq!(
        decide(&oversold_cross(), None, &settings(DecisionPreset::RsiMacd)).action,
        Action::Buy
    );
}

#[test]
fn when_preset_is_macd_cross_system_follows_the_signal_line() {
    let above = IndicatorSnapshot {
        rsi: Some(80.0),
        ..oversold_cross()
    };
    let below = IndicatorSnapshot {
        macd: Some(0.2),
        ..oversold_cross()
    };

    assert_eq!(
        decide(&above, None, &settings(DecisionPreset::MacdCross)).action,
        Action::Buy
    );
    assert_eq!(
        decide(&below, None, &settings(DecisionPreset::MacdCross)).action,
        Action::Sell
    );
}

#[test]
fn when_preset_is_moving_average_system_sells_below_the_slow_average() {
    // Given: a steady decline long enough for MA200
    let closes = (0..300).map(|i| 300.0 - f64::from(i) * 0.5).collect::<Vec<_>>();
    let latest = indicators_for(closes).latest();

    // When: the moving_average preset decides
    let decision = decide(&latest, None, &settings(DecisionPreset::MovingAverage));

    // Then: MA50 below MA200 sells
    assert!(latest.ma_fast.expect("ma50") < latest.ma_slow.expect("ma200"));
    assert_eq!(decision.action, Action::Sell);
}

#[test]
fn when_preset_is_rsi_sentiment_system_needs_a_clear_label() {
    let oversold = IndicatorSnapshot {
        rsi: Some(25.0),
        ..IndicatorSnapshot::default()
    };
    let preset = settings(DecisionPreset::RsiSentiment);

    assert_eq!(decide(&oversold, Some(&sentiment(0.3, 3)), &preset).action, Action::Buy);
    assert_eq!(decide(&oversold, Some(&sentiment(0.15, 0)), &preset).action, Action::Hold);
    assert_eq!(decide(&oversold, None, &preset).action, Action::Hold);
}
