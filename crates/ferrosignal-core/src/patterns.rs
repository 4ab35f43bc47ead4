//! Candlestick classification of the most recent bar.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::PriceBar;

/// Body-to-range ratio under which a bar counts as a doji.
const DOJI_BODY_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlePattern {
    Doji,
    BullishEngulfing,
    BearishEngulfing,
    #[default]
    None,
}

impl CandlePattern {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doji => "Doji (Indecision)",
            Self::BullishEngulfing => "Bullish Engulfing",
            Self::BearishEngulfing => "Bearish Engulfing",
            Self::None => "None",
        }
    }

    /// Classifies the last bar against the one before it.
    ///
    /// Doji takes precedence over the engulfing checks. Fewer than two bars
    /// yields [`CandlePattern::None`].
    pub fn detect(bars: &[PriceBar]) -> Self {
        let [.., previous, last] = bars else {
            return Self::None;
        };

        if last.body() < DOJI_BODY_RATIO * last.range() {
            Self::Doji
        } else if last.close > last.open && last.open < previous.close {
            Self::BullishEngulfing
        } else if last.close < last.open && last.open > previous.close {
            Self::BearishEngulfing
        } else {
            Self::None
        }
    }
}

impl Display for CandlePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
