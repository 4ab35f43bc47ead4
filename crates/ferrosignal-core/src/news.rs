//! News page sources.
//!
//! A [`NewsSource`] fetches the raw markup of one page. Failures are
//! per-page and recoverable: the sentiment engine logs them and moves on.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::http_client::{HttpClient, HttpRequest, BROWSER_USER_AGENT};

/// Per-page fetch failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NewsError {
    #[error("request to '{url}' timed out")]
    Timeout { url: String },
    #[error("request to '{url}' failed: {message}")]
    Transport { url: String, message: String },
    #[error("'{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("no page registered for '{url}'")]
    NotFound { url: String },
}

impl NewsError {
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::NotFound { url } => url,
        }
    }
}

pub trait NewsSource: Send + Sync {
    /// Fetches the markup of `url`, giving up after `timeout_ms`.
    fn fetch_page<'a>(
        &'a self,
        url: &'a str,
        timeout_ms: u64,
    ) -> Pin<Box<dyn Future<Output = Result<String, NewsError>> + Send + 'a>>;
}

/// Transport-backed source sending a browser User-Agent.
#[derive(Clone)]
pub struct HttpNewsSource {
    http_client: Arc<dyn HttpClient>,
}

impl HttpNewsSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }
}

impl NewsSource for HttpNewsSource {
    fn fetch_page<'a>(
        &'a self,
        url: &'a str,
        timeout_ms: u64,
    ) -> Pin<Box<dyn Future<Output = Result<String, NewsError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(url)
                .with_user_agent(BROWSER_USER_AGENT)
                .with_header("accept", "text/html")
                .with_timeout_ms(timeout_ms);

            let response = self.http_client.execute(request).await.map_err(|error| {
                if error.timed_out() {
                    NewsError::Timeout {
                        url: url.to_owned(),
                    }
                } else {
                    NewsError::Transport {
                        url: url.to_owned(),
                        message: error.message().to_owned(),
                    }
                }
            })?;

            if !response.is_success() {
                return Err(NewsError::Status {
                    url: url.to_owned(),
                    status: response.status,
                });
            }
            Ok(response.body)
        })
    }
}

/// In-memory pages keyed by URL, for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticNewsSource {
    pages: HashMap<String, Result<String, NewsError>>,
}

impl StaticNewsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Ok(markup.into()));
        self
    }

    pub fn with_failure(mut self, url: impl Into<String>, error: NewsError) -> Self {
        self.pages.insert(url.into(), Err(error));
        self
    }
}

impl NewsSource for StaticNewsSource {
    fn fetch_page<'a>(
        &'a self,
        url: &'a str,
        _timeout_ms: u64,
    ) -> Pin<Box<dyn Future<Output = Result<String, NewsError>> + Send + 'a>> {
        Box::pin(async move {
            self.pages.get(url).cloned().unwrap_or_else(|| {
                Err(NewsError::NotFound {
                    url: url.to_owned(),
                })
            })
        })
    }
}
