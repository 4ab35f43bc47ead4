use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Bounded history window requested from the price source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LookbackPeriod {
    Days(u32),
    Months(u32),
    Years(u32),
    Max,
}

impl LookbackPeriod {
    /// Provider range token, e.g. `60d`, `6mo`, `1y`, `max`.
    pub fn as_range(self) -> String {
        match self {
            Self::Days(count) => format!("{count}d"),
            Self::Months(count) => format!("{count}mo"),
            Self::Years(count) => format!("{count}y"),
            Self::Max => String::from("max"),
        }
    }

    /// Approximate window length in days, `None` for `max`.
    pub fn approx_days(self) -> Option<u32> {
        match self {
            Self::Days(count) => Some(count),
            Self::Months(count) => Some(count.saturating_mul(30)),
            Self::Years(count) => Some(count.saturating_mul(365)),
            Self::Max => None,
        }
    }
}

impl Display for LookbackPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_range())
    }
}

impl FromStr for LookbackPeriod {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let invalid = || ValidationError::InvalidPeriod {
            value: value.to_owned(),
        };

        if normalized == "max" {
            return Ok(Self::Max);
        }

        let split = normalized
            .find(|ch: char| !ch.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (digits, unit) = normalized.split_at(split);
        let count: u32 = digits.parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }

        match unit {
            "d" => Ok(Self::Days(count)),
            "mo" => Ok(Self::Months(count)),
            "y" => Ok(Self::Years(count)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for LookbackPeriod {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LookbackPeriod> for String {
    fn from(value: LookbackPeriod) -> Self {
        value.as_range()
    }
}
