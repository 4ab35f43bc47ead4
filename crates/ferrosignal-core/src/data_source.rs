//! Price source trait and request/response types.
//!
//! A [`PriceSource`] turns a [`BarsRequest`] (symbol, interval, lookback
//! period) into a time-ordered [`BarSeries`]. Adapters must drop rows with
//! missing fields and report "no usable rows" as
//! [`SourceErrorKind::NoData`], distinct from transport or payload failures.
//!
//! ```rust,ignore
//! use ferrosignal_core::{BarsRequest, PriceSource, YahooChartSource};
//!
//! async fn latest_close(source: &YahooChartSource, request: BarsRequest) -> Option<f64> {
//!     let series = source.bars(request).await.ok()?;
//!     series.latest().map(|bar| bar.close)
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{BarSeries, Interval, LookbackPeriod, Symbol};

/// Provider identifiers reported in run metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Yahoo,
    Synthetic,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Synthetic => "synthetic",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The provider answered but no usable bar survived.
    NoData,
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured price source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for bar endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarsRequest {
    pub symbol: Symbol,
    pub interval: Interval,
    pub period: LookbackPeriod,
}

impl BarsRequest {
    pub fn new(
        symbol: Symbol,
        interval: Interval,
        period: LookbackPeriod,
    ) -> Result<Self, SourceError> {
        if let Some(limit) = max_lookback_days(interval) {
            if period.approx_days().map_or(true, |days| days > limit) {
                return Err(SourceError::invalid_request(format!(
                    "interval {interval} supports a lookback period of at most {limit}d, got {period}"
                )));
            }
        }

        Ok(Self {
            symbol,
            interval,
            period,
        })
    }
}

/// Longest history Yahoo serves for an interval, `None` when unbounded.
fn max_lookback_days(interval: Interval) -> Option<u32> {
    match interval {
        Interval::OneMinute => Some(7),
        Interval::FiveMinutes | Interval::FifteenMinutes => Some(60),
        Interval::OneHour => Some(730),
        Interval::OneDay | Interval::OneWeek => None,
    }
}

/// Price source adapter contract.
///
/// Implementations must be `Send + Sync`; the pipeline holds them behind
/// `Arc<dyn PriceSource>`.
pub trait PriceSource: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches historical OHLCV bars.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] with kind [`SourceErrorKind::NoData`] when the
    /// provider returned no usable rows, and another kind for transport or
    /// payload failures.
    fn bars<'a>(
        &'a self,
        req: BarsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol() -> Symbol {
        Symbol::parse("IUSA.L").expect("valid symbol")
    }

    #[test]
    fn hourly_request_accepts_sixty_days() {
        let request = BarsRequest::new(symbol(), Interval::OneHour, LookbackPeriod::Days(60))
            .expect("valid request");
        assert_eq!(request.period.as_range(), "60d");
    }

    #[test]
    fn intraday_request_rejects_long_history() {
        let error = BarsRequest::new(symbol(), Interval::FiveMinutes, LookbackPeriod::Years(1))
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(error.message().contains("60d"));
    }

    #[test]
    fn minute_request_is_limited_to_a_week() {
        BarsRequest::new(symbol(), Interval::OneMinute, LookbackPeriod::Days(5))
            .expect("valid request");
        let error = BarsRequest::new(symbol(), Interval::OneMinute, LookbackPeriod::Days(30))
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(error.message().contains("at most 7d"));
    }

    #[test]
    fn hourly_request_rejects_max_history() {
        let error = BarsRequest::new(symbol(), Interval::OneHour, LookbackPeriod::Max)
            .expect_err("must fail");
        assert_eq!(error.code(), "source.invalid_request");
    }

    #[test]
    fn no_data_is_not_retryable() {
        let error = SourceError::no_data("empty chart");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
        assert!(!error.retryable());
        assert_eq!(error.to_string(), "empty chart (source.no_data)");
    }
}
