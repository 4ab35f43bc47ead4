//! # Pipeline
//!
//! One explicit run over four stages:
//!
//! ```text
//! price ──▶ indicators ──┐
//!                        ├──▶ decision ──▶ SignalReport
//! news ───▶ sentiment ───┘
//! ```
//!
//! Missing price data is the only fatal condition. Short histories withhold
//! individual indicators and failing news pages are skipped; both are
//! recorded as [`StageOutcome::Partial`] and surfaced in the report warnings.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SignalConfig;
use crate::data_source::{BarsRequest, PriceSource, ProviderId, SourceErrorKind};
use crate::indicators::{IndicatorKind, IndicatorSeries, IndicatorSettings, IndicatorSnapshot};
use crate::news::NewsSource;
use crate::patterns::CandlePattern;
use crate::sentiment::{SentimentEngine, SentimentSummary};
use crate::signal::{decide, Decision};
use crate::{BarSeries, Interval, LookbackPeriod, PipelineError, Symbol, UtcDateTime};

/// Result of a single non-fatal stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Complete(T),
    /// Usable value with known gaps.
    Partial { value: T, issues: Vec<String> },
    Unavailable { reason: String },
}

impl<T> StageOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Complete(value) | Self::Partial { value, .. } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Complete(value) | Self::Partial { value, .. } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn status(&self) -> StageStatus {
        match self {
            Self::Complete(_) => StageStatus::Complete,
            Self::Partial { .. } => StageStatus::Partial,
            Self::Unavailable { .. } => StageStatus::Unavailable,
        }
    }

    /// Issues for partial stages, the reason for unavailable ones.
    pub fn issues(&self) -> Vec<String> {
        match self {
            Self::Complete(_) => Vec::new(),
            Self::Partial { issues, .. } => issues.clone(),
            Self::Unavailable { reason } => vec![reason.clone()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Complete,
    Partial,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStatuses {
    pub indicators: StageStatus,
    pub sentiment: StageStatus,
}

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub run_id: Uuid,
    pub generated_at: UtcDateTime,
    pub latency_ms: u64,
    pub source: ProviderId,
    pub stages: StageStatuses,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Everything a presentation layer needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReport {
    pub meta: ReportMeta,
    pub symbol: Symbol,
    pub interval: Interval,
    pub period: LookbackPeriod,
    pub latest_price: f64,
    pub latest_timestamp: UtcDateTime,
    pub bar_count: usize,
    pub indicators: IndicatorSnapshot,
    pub available: Vec<IndicatorKind>,
    pub withheld: Vec<IndicatorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentSummary>,
    pub pattern: CandlePattern,
    pub decision: Decision,
    /// Full indicator columns for charting.
    pub series: IndicatorSeries,
}

/// Pipeline composed of a price source, a news source and a configuration.
#[derive(Clone)]
pub struct Pipeline {
    config: SignalConfig,
    prices: Arc<dyn PriceSource>,
    news: Arc<dyn NewsSource>,
}

impl Pipeline {
    pub fn new(
        config: SignalConfig,
        prices: Arc<dyn PriceSource>,
        news: Arc<dyn NewsSource>,
    ) -> Self {
        Self {
            config,
            prices,
            news,
        }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<SignalReport, PipelineError> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();
        self.config.validate()?;

        let config = &self.config;
        let period = config.period();
        info!(%run_id, symbol = %config.symbol, interval = %config.interval, %period, "starting signal run");

        let series = self.price_stage(period).await?;
        let Some(latest) = series.latest().cloned() else {
            return Err(PipelineError::DataUnavailable {
                symbol: config.symbol.to_string(),
                reason: String::from("price table is empty"),
            });
        };

        let indicators = self.indicator_stage(&series);
        let sentiment = self.sentiment_stage().await;

        let mut warnings = Vec::new();
        let dropped = series.dropped();
        if dropped.total() > 0 {
            warnings.push(format!("dropped {} price rows ({dropped})", dropped.total()));
        }
        warnings.extend(indicators.issues());
        if config.decision.preset.uses_sentiment() {
            warnings.extend(sentiment.issues());
        }
        let stages = StageStatuses {
            indicators: indicators.status(),
            sentiment: sentiment.status(),
        };

        let series_values = indicators
            .into_value()
            .unwrap_or_else(|| IndicatorSeries::compute(&series, &config.indicators));
        let snapshot = series_values.latest();
        let sentiment = sentiment.into_value();
        let decision = decide(&snapshot, sentiment.as_ref(), &config.decision.settings());
        let pattern = CandlePattern::detect(series.bars());
        info!(
            technical = %decision.technical,
            action = %decision.action,
            preset = %decision.preset,
            "decision complete"
        );

        Ok(SignalReport {
            meta: ReportMeta {
                run_id,
                generated_at: UtcDateTime::now(),
                latency_ms: elapsed_ms(started),
                source: self.prices.id(),
                stages,
                warnings,
            },
            symbol: config.symbol.clone(),
            interval: config.interval,
            period,
            latest_price: latest.close,
            latest_timestamp: latest.ts,
            bar_count: series.len(),
            indicators: snapshot,
            available: series_values.available(),
            withheld: series_values.withheld(),
            sentiment,
            pattern,
            decision,
            series: series_values,
        })
    }

    async fn price_stage(&self, period: LookbackPeriod) -> Result<BarSeries, PipelineError> {
        let config = &self.config;
        let request = BarsRequest::new(config.symbol.clone(), config.interval, period)
            .map_err(PipelineError::Source)?;

        let series = self.prices.bars(request).await.map_err(|error| {
            if error.kind() == SourceErrorKind::NoData {
                PipelineError::DataUnavailable {
                    symbol: config.symbol.to_string(),
                    reason: error.message().to_owned(),
                }
            } else {
                PipelineError::Source(error)
            }
        })?;

        if series.is_empty() {
            return Err(PipelineError::DataUnavailable {
                symbol: config.symbol.to_string(),
                reason: String::from("price source returned no bars"),
            });
        }
        debug!(bars = series.len(), source = %self.prices.id(), "price stage complete");
        Ok(series)
    }

    fn indicator_stage(&self, series: &BarSeries) -> StageOutcome<IndicatorSeries> {
        let settings = &self.config.indicators;
        let values = IndicatorSeries::compute(series, settings);
        let withheld = values.withheld();
        if withheld.is_empty() {
            return StageOutcome::Complete(values);
        }

        let issues = withheld
            .iter()
            .map(|kind| {
                let issue = format!(
                    "insufficient history for {}: need {} bars, have {}",
                    kind.as_str(),
                    required_bars(*kind, settings),
                    series.len()
                );
                warn!("{issue}");
                issue
            })
            .collect();
        StageOutcome::Partial { value: values, issues }
    }

    async fn sentiment_stage(&self) -> StageOutcome<SentimentSummary> {
        let config = &self.config;
        if !config.decision.preset.uses_sentiment() {
            return StageOutcome::Unavailable {
                reason: format!("sentiment not used by preset {}", config.decision.preset),
            };
        }
        if !config.news.enabled {
            return StageOutcome::Unavailable {
                reason: String::from("news disabled; decision uses neutral sentiment"),
            };
        }

        let engine = match SentimentEngine::from_config(&config.news) {
            Ok(engine) => engine,
            Err(error) => {
                return StageOutcome::Unavailable {
                    reason: format!("sentiment engine unavailable: {error}"),
                }
            }
        };

        let summary = engine.collect(self.news.as_ref(), &config.news.urls).await;
        debug!(
            score = summary.score,
            triggers = summary.trigger_count,
            samples = summary.samples.len(),
            "sentiment stage complete"
        );

        if summary.pages_failed == 0 {
            StageOutcome::Complete(summary)
        } else {
            let issues = vec![format!(
                "{} of {} news pages failed",
                summary.pages_failed, summary.pages_attempted
            )];
            StageOutcome::Partial {
                value: summary,
                issues,
            }
        }
    }
}

/// Closes needed before `kind` produces its first value.
fn required_bars(kind: IndicatorKind, settings: &IndicatorSettings) -> usize {
    match kind {
        IndicatorKind::Rsi => settings.rsi_window,
        IndicatorKind::Macd => settings.macd_slow,
        IndicatorKind::MacdSignal => settings.macd_slow + settings.macd_signal - 1,
        IndicatorKind::MaFast => settings.ma_fast,
        IndicatorKind::MaSlow => settings.ma_slow,
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
