//! # Signal Decision
//!
//! Pure decision tables over the latest indicator values and the news
//! sentiment summary. Every function here is deterministic and stateless.
//!
//! Technical table (first match wins; a rule whose inputs are missing is
//! skipped):
//!
//! | # | Condition | Signal |
//! |---|-----------|--------|
//! | 1 | RSI < oversold and MACD > signal | Buy |
//! | 2 | RSI > overbought and MACD < signal | Sell |
//! | 3 | MA fast > MA slow | Buy (Momentum) |
//! | 4 | otherwise | Hold |
//!
//! Combined table:
//!
//! | # | Condition | Action |
//! |---|-----------|--------|
//! | 1 | technical is Buy/BuyMomentum, score > 0, no triggers | BUY |
//! | 2 | technical is Sell, or score < sell score, or triggers >= sell count | SELL |
//! | 3 | otherwise | HOLD |
//!
//! The narrower presets each read a single rule: `rsi_macd` (rules 1 and 2
//! of the technical table, no momentum), `macd_cross` (MACD against its
//! signal line), `moving_average` (fast average against slow) and
//! `rsi_sentiment` (RSI extreme confirmed by a positive or negative label).

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSnapshot;
use crate::sentiment::{SentimentLabel, SentimentSummary};
use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalSignal {
    Buy,
    BuyMomentum,
    Sell,
    Hold,
}

impl TechnicalSignal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::BuyMomentum => "Buy (Momentum)",
            Self::Sell => "Sell",
            Self::Hold => "Hold",
        }
    }

    pub const fn is_buy(self) -> bool {
        matches!(self, Self::Buy | Self::BuyMomentum)
    }
}

impl Display for TechnicalSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RSI bounds for the technical table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

/// Sentiment limits for the combined table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentGate {
    /// Scores strictly below this force a sell.
    pub sell_score: f64,
    /// This many triggered headlines force a sell.
    pub sell_trigger_count: usize,
}

impl Default for SentimentGate {
    fn default() -> Self {
        Self {
            sell_score: -0.2,
            sell_trigger_count: 2,
        }
    }
}

/// How technical and sentiment state are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPreset {
    /// Technical table only; sentiment is ignored.
    Technical,
    #[default]
    Combined,
    /// RSI extreme, MACD cross and sentiment sign must all agree.
    Confirmed,
    /// RSI extreme with a MACD cross; momentum alone holds.
    RsiMacd,
    MacdCross,
    /// MA fast above slow buys, below sells.
    MovingAverage,
    /// RSI extreme with a non-neutral sentiment label of the same sign.
    RsiSentiment,
}

impl DecisionPreset {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Combined => "combined",
            Self::Confirmed => "confirmed",
            Self::RsiMacd => "rsi_macd",
            Self::MacdCross => "macd_cross",
            Self::MovingAverage => "moving_average",
            Self::RsiSentiment => "rsi_sentiment",
        }
    }

    pub const fn uses_sentiment(self) -> bool {
        matches!(self, Self::Combined | Self::Confirmed | Self::RsiSentiment)
    }
}

impl Display for DecisionPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionPreset {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(Self::Technical),
            "combined" => Ok(Self::Combined),
            "confirmed" => Ok(Self::Confirmed),
            "rsi_macd" | "rsi-macd" => Ok(Self::RsiMacd),
            "macd_cross" | "macd-cross" => Ok(Self::MacdCross),
            "moving_average" | "moving-average" => Ok(Self::MovingAverage),
            "rsi_sentiment" | "rsi-sentiment" => Ok(Self::RsiSentiment),
            _ => Err(ValidationError::InvalidPreset {
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionSettings {
    pub preset: DecisionPreset,
    pub thresholds: Thresholds,
    pub gate: SentimentGate,
}

/// Outcome of the decision stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub technical: TechnicalSignal,
    pub action: Action,
    pub preset: DecisionPreset,
}

fn oversold_cross(snapshot: &IndicatorSnapshot, thresholds: &Thresholds) -> Option<bool> {
    Some(snapshot.rsi? < thresholds.oversold && snapshot.macd? > snapshot.macd_signal?)
}

fn overbought_cross(snapshot: &IndicatorSnapshot, thresholds: &Thresholds) -> Option<bool> {
    Some(snapshot.rsi? > thresholds.overbought && snapshot.macd? < snapshot.macd_signal?)
}

fn momentum(snapshot: &IndicatorSnapshot) -> Option<bool> {
    Some(snapshot.ma_fast? > snapshot.ma_slow?)
}

pub fn technical_signal(snapshot: &IndicatorSnapshot, thresholds: &Thresholds) -> TechnicalSignal {
    if oversold_cross(snapshot, thresholds) == Some(true) {
        TechnicalSignal::Buy
    } else if overbought_cross(snapshot, thresholds) == Some(true) {
        TechnicalSignal::Sell
    } else if momentum(snapshot) == Some(true) {
        TechnicalSignal::BuyMomentum
    } else {
        TechnicalSignal::Hold
    }
}

pub fn combined_signal(
    technical: TechnicalSignal,
    sentiment: &SentimentSummary,
    gate: &SentimentGate,
) -> Action {
    if technical.is_buy() && sentiment.score > 0.0 && sentiment.trigger_count == 0 {
        Action::Buy
    } else if technical == TechnicalSignal::Sell
        || sentiment.score < gate.sell_score
        || sentiment.trigger_count >= gate.sell_trigger_count
    {
        Action::Sell
    } else {
        Action::Hold
    }
}

pub fn technical_action(technical: TechnicalSignal) -> Action {
    match technical {
        TechnicalSignal::Buy | TechnicalSignal::BuyMomentum => Action::Buy,
        TechnicalSignal::Sell => Action::Sell,
        TechnicalSignal::Hold => Action::Hold,
    }
}

pub fn confirmed_signal(
    snapshot: &IndicatorSnapshot,
    sentiment: &SentimentSummary,
    thresholds: &Thresholds,
) -> Action {
    if oversold_cross(snapshot, thresholds) == Some(true) && sentiment.score > 0.0 {
        Action::Buy
    } else if overbought_cross(snapshot, thresholds) == Some(true) && sentiment.score < 0.0 {
        Action::Sell
    } else {
        Action::Hold
    }
}

/// Rules 1 and 2 of the technical table without the momentum fallback.
pub fn rsi_macd_signal(snapshot: &IndicatorSnapshot, thresholds: &Thresholds) -> Action {
    if oversold_cross(snapshot, thresholds) == Some(true) {
        Action::Buy
    } else if overbought_cross(snapshot, thresholds) == Some(true) {
        Action::Sell
    } else {
        Action::Hold
    }
}

fn ordering_action(fast: Option<f64>, slow: Option<f64>) -> Action {
    match (fast, slow) {
        (Some(fast), Some(slow)) if fast > slow => Action::Buy,
        (Some(fast), Some(slow)) if fast < slow => Action::Sell,
        _ => Action::Hold,
    }
}

pub fn macd_cross_signal(snapshot: &IndicatorSnapshot) -> Action {
    ordering_action(snapshot.macd, snapshot.macd_signal)
}

pub fn moving_average_signal(snapshot: &IndicatorSnapshot) -> Action {
    ordering_action(snapshot.ma_fast, snapshot.ma_slow)
}

/// RSI extreme gated by the sentiment label rather than the raw sign.
pub fn rsi_sentiment_signal(
    snapshot: &IndicatorSnapshot,
    sentiment: &SentimentSummary,
    thresholds: &Thresholds,
) -> Action {
    match (snapshot.rsi, sentiment.label) {
        (Some(rsi), SentimentLabel::Positive) if rsi < thresholds.oversold => Action::Buy,
        (Some(rsi), SentimentLabel::Negative) if rsi > thresholds.overbought => Action::Sell,
        _ => Action::Hold,
    }
}

/// Applies the configured preset. Sentiment presets treat a missing summary
/// as the empty summary (score 0, no triggers).
pub fn decide(
    snapshot: &IndicatorSnapshot,
    sentiment: Option<&SentimentSummary>,
    settings: &DecisionSettings,
) -> Decision {
    let technical = technical_signal(snapshot, &settings.thresholds);
    let empty;
    let sentiment = match sentiment {
        Some(summary) => summary,
        None => {
            empty = SentimentSummary::empty();
            &empty
        }
    };

    let action = match settings.preset {
        DecisionPreset::Technical => technical_action(technical),
        DecisionPreset::Combined => combined_signal(technical, sentiment, &settings.gate),
        DecisionPreset::Confirmed => confirmed_signal(snapshot, sentiment, &settings.thresholds),
        DecisionPreset::RsiMacd => rsi_macd_signal(snapshot, &settings.thresholds),
        DecisionPreset::MacdCross => macd_cross_signal(snapshot),
        DecisionPreset::MovingAverage => moving_average_signal(snapshot),
        DecisionPreset::RsiSentiment => {
            rsi_sentiment_signal(snapshot, sentiment, &settings.thresholds)
        }
    };

    Decision {
        technical,
        action,
        preset: settings.preset,
    }
}
