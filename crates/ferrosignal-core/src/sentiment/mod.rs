//! # Sentiment Engine
//!
//! Turns a set of news pages into a [`SentimentSummary`]:
//!
//! 1. fetch each page through a [`NewsSource`] (concurrently, best effort),
//! 2. extract headlines with [`HeadlineExtractor`],
//! 3. score each headline with a [`PolarityScorer`] and match trigger keywords,
//! 4. aggregate into a mean score, a label and a trigger count.
//!
//! A page that fails is logged and counted in
//! [`SentimentSummary::pages_failed`]; it never aborts collection.

mod headlines;
mod keywords;
mod lexicon;

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use headlines::{HeadlineExtractor, HeadlineFilter, DEFAULT_SELECTOR};
pub use keywords::{TriggerMatcher, DEFAULT_TRIGGER_WORDS};
pub use lexicon::{LexiconScorer, PolarityScorer};

use crate::config::NewsConfig;
use crate::news::{NewsError, NewsSource};
use crate::ValidationError;

/// Score above which the summary is labelled positive.
pub const POSITIVE_LABEL_THRESHOLD: f64 = 0.2;
/// Score below which the summary is labelled negative.
pub const NEGATIVE_LABEL_THRESHOLD: f64 = -0.2;

/// One scored headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSample {
    pub source: String,
    pub headline: String,
    pub polarity: f64,
    pub triggers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_LABEL_THRESHOLD {
            Self::Positive
        } else if score < NEGATIVE_LABEL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl Display for SentimentLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate over every collected headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Mean polarity; `0.0` when there are no samples.
    pub score: f64,
    pub label: SentimentLabel,
    /// Number of samples matching at least one trigger keyword.
    pub trigger_count: usize,
    pub samples: Vec<SentimentSample>,
    pub pages_attempted: usize,
    pub pages_failed: usize,
}

impl SentimentSummary {
    pub fn from_samples(samples: Vec<SentimentSample>) -> Self {
        let score = if samples.is_empty() {
            0.0
        } else {
            samples.iter().map(|sample| sample.polarity).sum::<f64>() / samples.len() as f64
        };
        let trigger_count = samples
            .iter()
            .filter(|sample| !sample.triggers.is_empty())
            .count();

        Self {
            score,
            label: SentimentLabel::from_score(score),
            trigger_count,
            samples,
            pages_attempted: 0,
            pages_failed: 0,
        }
    }

    /// Summary with no headlines: neutral by default, not by measurement.
    pub fn empty() -> Self {
        Self::from_samples(Vec::new())
    }

    pub fn with_page_counts(mut self, attempted: usize, failed: usize) -> Self {
        self.pages_attempted = attempted;
        self.pages_failed = failed;
        self
    }
}

/// Scores headlines scraped from news pages.
#[derive(Clone)]
pub struct SentimentEngine {
    scorer: Arc<dyn PolarityScorer>,
    triggers: TriggerMatcher,
    extractor: HeadlineExtractor,
    timeout_ms: u64,
}

impl SentimentEngine {
    pub fn new(
        scorer: Arc<dyn PolarityScorer>,
        triggers: TriggerMatcher,
        extractor: HeadlineExtractor,
        timeout_ms: u64,
    ) -> Self {
        Self {
            scorer,
            triggers,
            extractor,
            timeout_ms,
        }
    }

    /// Builds an engine with the lexicon scorer and the configured
    /// keywords, selector, headline limit and timeout.
    pub fn from_config(config: &NewsConfig) -> Result<Self, ValidationError> {
        let triggers = TriggerMatcher::new(&config.trigger_words)?;
        let extractor =
            HeadlineExtractor::new(&config.selector, config.headlines_per_page, config.filter)?;
        Ok(Self::new(
            Arc::new(LexiconScorer::new()),
            triggers,
            extractor,
            config.timeout_ms,
        ))
    }

    pub fn triggers(&self) -> &TriggerMatcher {
        &self.triggers
    }

    /// Scores a single headline.
    pub fn sample(&self, source: &str, headline: &str) -> SentimentSample {
        SentimentSample {
            source: source.to_owned(),
            headline: headline.to_owned(),
            polarity: self.scorer.polarity(headline).clamp(-1.0, 1.0),
            triggers: self.triggers.matches(headline),
        }
    }

    /// Scores headlines from markup already in hand.
    pub fn score_page(&self, source: &str, markup: &str) -> Vec<SentimentSample> {
        self.extractor
            .extract(markup, &self.triggers)
            .iter()
            .map(|headline| self.sample(source, headline))
            .collect()
    }

    /// Fetches every page concurrently and aggregates the headlines.
    ///
    /// Samples keep the order of `pages`, then document order within a page.
    pub async fn collect(&self, news: &dyn NewsSource, pages: &[String]) -> SentimentSummary {
        let timeout = Duration::from_millis(self.timeout_ms);
        let fetches = pages.iter().map(|url| async move {
            let result = match tokio::time::timeout(timeout, news.fetch_page(url, self.timeout_ms))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(NewsError::Timeout { url: url.clone() }),
            };
            (url, result)
        });
        let results = join_all(fetches).await;

        let mut samples = Vec::new();
        let mut failed = 0;
        for (url, result) in results {
            match result {
                Ok(markup) => {
                    let page_samples = self.score_page(source_label(url), &markup);
                    debug!(url = %url, headlines = page_samples.len(), "scored news page");
                    samples.extend(page_samples);
                }
                Err(error) => {
                    failed += 1;
                    warn!(url = %url, error = %error, "skipping news page");
                }
            }
        }

        SentimentSummary::from_samples(samples).with_page_counts(pages.len(), failed)
    }
}

/// Host part of a page URL, used to attribute samples.
fn source_label(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = without_scheme.split('/').next().unwrap_or(without_scheme);
    host.strip_prefix("www.").unwrap_or(host)
}
