//! # Ferrosignal Core
//!
//! Core contracts and engines for the ferrosignal ETF signal pipeline.
//!
//! ## Overview
//!
//! A single linear pipeline for one instrument:
//!
//! - **Price stage**: fetch OHLCV bars through a [`PriceSource`] adapter
//! - **Indicator stage**: RSI, MACD with signal line, fast/slow moving averages
//! - **Sentiment stage**: scrape headlines, score polarity, count trigger keywords
//! - **Decision stage**: collapse the above into BUY / SELL / HOLD
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Price source adapters (Yahoo chart API, synthetic) |
//! | [`config`] | TOML-backed run configuration |
//! | [`data_source`] | Price source trait and request/error types |
//! | [`domain`] | Domain models (Symbol, Interval, PriceBar, BarSeries) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`indicators`] | Indicator engine |
//! | [`news`] | News page sources |
//! | [`patterns`] | Candlestick pattern classification |
//! | [`pipeline`] | Pipeline orchestration and report |
//! | [`sentiment`] | Headline extraction, polarity scoring, trigger matching |
//! | [`signal`] | Decision tables |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ferrosignal_core::{Pipeline, SignalConfig, SyntheticSource, StaticNewsSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(
//!         SignalConfig::default(),
//!         Arc::new(SyntheticSource::default()),
//!         Arc::new(StaticNewsSource::default()),
//!     );
//!     let report = pipeline.run().await?;
//!     println!("{} -> {}", report.symbol, report.decision.action);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ PriceSource  │──▶│  Indicators  │──▶│              │
//! └──────────────┘   └──────────────┘   │   Decision   │──▶ SignalReport
//! ┌──────────────┐   ┌──────────────┐   │              │
//! │  NewsSource  │──▶│  Sentiment   │──▶│              │
//! └──────────────┘   └──────────────┘   └──────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod indicators;
pub mod news;
pub mod patterns;
pub mod pipeline;
pub mod sentiment;
pub mod signal;

// Adapter implementations
pub use adapters::{SyntheticSource, SyntheticTrend, YahooChartSource};

// Configuration
pub use config::{DecisionConfig, NewsConfig, SignalConfig};

// Price source trait and types
pub use data_source::{BarsRequest, PriceSource, ProviderId, SourceError, SourceErrorKind};

// Domain models
pub use domain::{
    BarSeries, Interval, LookbackPeriod, PriceBar, RawBar, RawDropStats, Symbol, UtcDateTime,
};

// Errors
pub use error::{ConfigError, PipelineError, ValidationError};

// HTTP client
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, BROWSER_USER_AGENT,
};

// Engines
pub use indicators::{IndicatorKind, IndicatorSeries, IndicatorSettings, IndicatorSnapshot};
pub use news::{HttpNewsSource, NewsError, NewsSource, StaticNewsSource};
pub use patterns::CandlePattern;
pub use pipeline::{Pipeline, ReportMeta, SignalReport, StageOutcome};
pub use sentiment::{
    HeadlineFilter, LexiconScorer, PolarityScorer, SentimentEngine, SentimentLabel,
    SentimentSample, SentimentSummary, TriggerMatcher,
};
pub use signal::{
    Action, Decision, DecisionPreset, DecisionSettings, SentimentGate, TechnicalSignal,
    Thresholds,
};
