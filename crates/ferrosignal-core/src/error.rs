use thiserror::Error;

use crate::data_source::SourceError;

/// Validation and contract errors exposed by `ferrosignal-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid interval '{value}', expected one of 1m, 5m, 15m, 1h, 1d, 1wk")]
    InvalidInterval { value: String },
    #[error("invalid lookback period '{value}', expected <count>d, <count>mo, <count>y or max")]
    InvalidPeriod { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("indicator window '{name}' must be greater than zero")]
    ZeroWindow { name: &'static str },
    #[error("fast window {fast} must be shorter than slow window {slow} for {name}")]
    WindowOrder {
        name: &'static str,
        fast: usize,
        slow: usize,
    },

    #[error("threshold '{field}' is out of range: {value}")]
    ThresholdOutOfRange { field: &'static str, value: String },
    #[error("invalid decision preset '{value}', expected one of technical, combined, confirmed, rsi_macd, macd_cross, moving_average, rsi_sentiment")]
    InvalidPreset { value: String },
    #[error("invalid headline filter '{value}', expected one of all, triggers_only")]
    InvalidHeadlineFilter { value: String },
    #[error("invalid headline selector '{value}'")]
    InvalidSelector { value: String },
    #[error("invalid trigger word '{value}'")]
    InvalidTriggerWord { value: String },
    #[error("news url must be http(s): '{value}'")]
    InvalidNewsUrl { value: String },
    #[error("field '{field}' must be greater than zero")]
    ZeroValue { field: &'static str },
}

/// Failure of a single pipeline run.
///
/// Only missing price data is fatal. Short histories and news failures are
/// reported inside the [`SignalReport`](crate::pipeline::SignalReport) instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("price data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("price source failed: {0}")]
    Source(SourceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PipelineError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "pipeline.data_unavailable",
            Self::Source(_) => "pipeline.source",
            Self::Validation(_) => "pipeline.validation",
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
