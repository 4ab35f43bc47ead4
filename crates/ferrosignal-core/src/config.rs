//! Run configuration.
//!
//! A single value object replaces the scattered constants of a dashboard
//! script. Every field has a default; a TOML file may override any subset:
//!
//! ```toml
//! symbol = "IUSA.L"
//! interval = "1d"          # period defaults to 6mo for 1d, 60d for 1h
//!
//! [indicators]
//! rsi_window = 14
//!
//! [news]
//! enabled = true
//! headlines_per_page = 5
//! filter = "triggers_only"
//!
//! [decision]
//! preset = "confirmed"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSettings;
use crate::sentiment::{
    HeadlineExtractor, HeadlineFilter, TriggerMatcher, DEFAULT_SELECTOR, DEFAULT_TRIGGER_WORDS,
};
use crate::signal::{DecisionPreset, DecisionSettings, SentimentGate, Thresholds};
use crate::{ConfigError, Interval, LookbackPeriod, Symbol, ValidationError};

pub const DEFAULT_SYMBOL: &str = "IUSA.L";

pub const DEFAULT_NEWS_URLS: &[&str] = &[
    "https://www.bbc.com/news/business",
    "https://www.reuters.com/business/",
    "https://www.cnbc.com/world/",
    "https://finance.yahoo.com",
    "https://www.ft.com/markets",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalConfig {
    pub symbol: Symbol,
    pub interval: Interval,
    /// Lookback window; the interval's default when unset.
    pub period: Option<LookbackPeriod>,
    pub indicators: IndicatorSettings,
    pub news: NewsConfig,
    pub decision: DecisionConfig,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            symbol: Symbol::from_static(DEFAULT_SYMBOL),
            interval: Interval::OneHour,
            period: None,
            indicators: IndicatorSettings::default(),
            news: NewsConfig::default(),
            decision: DecisionConfig::default(),
        }
    }
}

impl SignalConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Parses and validates TOML text; `origin` names the source in errors.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn period(&self) -> LookbackPeriod {
        self.period.unwrap_or_else(|| self.interval.default_period())
    }

    /// Whether the sentiment stage runs for this configuration.
    pub fn sentiment_enabled(&self) -> bool {
        self.news.enabled && self.decision.preset.uses_sentiment()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.indicators.validate()?;
        self.news.validate()?;
        self.decision.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsConfig {
    pub enabled: bool,
    pub urls: Vec<String>,
    pub headlines_per_page: usize,
    pub timeout_ms: u64,
    pub trigger_words: Vec<String>,
    /// CSS selector for headline elements.
    pub selector: String,
    pub filter: HeadlineFilter,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            urls: DEFAULT_NEWS_URLS.iter().map(|url| (*url).to_owned()).collect(),
            headlines_per_page: 5,
            timeout_ms: 5_000,
            trigger_words: DEFAULT_TRIGGER_WORDS
                .iter()
                .map(|word| (*word).to_owned())
                .collect(),
            selector: DEFAULT_SELECTOR.to_owned(),
            filter: HeadlineFilter::All,
        }
    }
}

impl NewsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.headlines_per_page == 0 {
            return Err(ValidationError::ZeroValue {
                field: "news.headlines_per_page",
            });
        }
        if self.timeout_ms == 0 {
            return Err(ValidationError::ZeroValue {
                field: "news.timeout_ms",
            });
        }
        for url in &self.urls {
            let lower = url.to_ascii_lowercase();
            let host = lower
                .strip_prefix("https://")
                .or_else(|| lower.strip_prefix("http://"));
            if host.map_or(true, str::is_empty) {
                return Err(ValidationError::InvalidNewsUrl { value: url.clone() });
            }
        }

        TriggerMatcher::new(&self.trigger_words)?;
        HeadlineExtractor::new(&self.selector, self.headlines_per_page, self.filter)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecisionConfig {
    pub preset: DecisionPreset,
    pub oversold: f64,
    pub overbought: f64,
    pub sell_score: f64,
    pub sell_trigger_count: usize,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        let gate = SentimentGate::default();
        Self {
            preset: DecisionPreset::default(),
            oversold: thresholds.oversold,
            overbought: thresholds.overbought,
            sell_score: gate.sell_score,
            sell_trigger_count: gate.sell_trigger_count,
        }
    }
}

impl DecisionConfig {
    pub fn settings(&self) -> DecisionSettings {
        DecisionSettings {
            preset: self.preset,
            thresholds: Thresholds {
                oversold: self.oversold,
                overbought: self.overbought,
            },
            gate: SentimentGate {
                sell_score: self.sell_score,
                sell_trigger_count: self.sell_trigger_count,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("decision.oversold", self.oversold, 0.0, 100.0)?;
        check_range("decision.overbought", self.overbought, 0.0, 100.0)?;
        if self.oversold >= self.overbought {
            return Err(ValidationError::ThresholdOutOfRange {
                field: "decision.oversold",
                value: format!("{} must be below overbought {}", self.oversold, self.overbought),
            });
        }
        check_range("decision.sell_score", self.sell_score, -1.0, 1.0)?;
        if self.sell_trigger_count == 0 {
            return Err(ValidationError::ZeroValue {
                field: "decision.sell_trigger_count",
            });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < min || value > max {
        return Err(ValidationError::ThresholdOutOfRange {
            field,
            value: format!("{value} not in [{min}, {max}]"),
        });
    }
    Ok(())
}
