use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::data_source::{BarsRequest, PriceSource, ProviderId, SourceError};
use crate::http_client::{HttpClient, HttpRequest, BROWSER_USER_AGENT};
use crate::{BarSeries, Interval, RawBar, Symbol};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart adapter.
///
/// Uses the public v8 chart endpoint with a `range`/`interval` pair, so the
/// lookback period maps directly onto the request.
#[derive(Clone)]
pub struct YahooChartSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl YahooChartSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(CHART_BASE_URL),
            timeout_ms: 10_000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn endpoint(&self, req: &BarsRequest) -> String {
        format!(
            "{}/{}?range={}&interval={}&includePrePost=false",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(req.symbol.as_str()),
            req.period.as_range(),
            req.interval.as_str(),
        )
    }

    async fn fetch_bars(&self, req: BarsRequest) -> Result<BarSeries, SourceError> {
        let endpoint = self.endpoint(&req);
        debug!(%endpoint, "requesting yahoo chart");

        let request = HttpRequest::get(&endpoint)
            .with_user_agent(BROWSER_USER_AGENT)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        match response.status {
            429 => {
                return Err(SourceError::rate_limited("yahoo returned status 429"));
            }
            404 => {
                return Err(SourceError::no_data(format!(
                    "yahoo has no chart for {}",
                    req.symbol
                )));
            }
            status if !response.is_success() => {
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {status}"
                )));
            }
            _ => {}
        }

        parse_chart(&response.body, req.symbol, req.interval)
    }
}

impl PriceSource for YahooChartSource {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn bars<'a>(
        &'a self,
        req: BarsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_bars(req))
    }
}

/// Parses a v8 chart payload into a series, dropping rows with missing fields.
pub(crate) fn parse_chart(
    body: &str,
    symbol: Symbol,
    interval: Interval,
) -> Result<BarSeries, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart_response.chart.error {
        let description = error
            .description
            .or(error.code)
            .unwrap_or_else(|| String::from("unknown error"));
        return Err(SourceError::no_data(format!(
            "yahoo chart API error: {description}"
        )));
    }

    let result = chart_response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::no_data("no chart data in response"))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    let rows = timestamps
        .iter()
        .enumerate()
        .map(|(i, &ts)| RawBar {
            ts: Some(ts),
            open: column_value(&quote.open, i),
            high: column_value(&quote.high, i),
            low: column_value(&quote.low, i),
            close: column_value(&quote.close, i),
            volume: quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .and_then(|v| u64::try_from(v).ok()),
        })
        .collect::<Vec<_>>();

    let (series, dropped) = BarSeries::from_raw(symbol, interval, rows);
    if dropped.total() > 0 {
        warn!(
            incomplete = dropped.incomplete,
            invalid = dropped.invalid,
            duplicates = dropped.duplicates,
            "dropped yahoo rows"
        );
    }

    if series.is_empty() {
        return Err(SourceError::no_data(format!(
            "yahoo returned no usable bars for {}",
            series.symbol
        )));
    }

    Ok(series)
}

fn column_value(column: &[Option<f64>], index: usize) -> Option<f64> {
    column
        .get(index)
        .copied()
        .flatten()
        .filter(|value| value.is_finite())
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}
