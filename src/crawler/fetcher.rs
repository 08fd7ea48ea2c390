//! HTTP fetcher implementation
//!
//! This module handles all network access for the crawler, including:
//! - The `PageFetcher` seam the scheduler is written against
//! - Building HTTP clients with proper user agent strings
//! - Full page loads and lightweight existence probes
//! - Retry with escalating per-attempt timeouts
//! - Error classification

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// A successfully loaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Document body
    pub body: String,
}

/// Errors that can occur while loading a page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Not an HTML document: {0}")]
    NotHtml(String),
}

impl FetchError {
    /// Returns true if another attempt could succeed
    ///
    /// | Condition | Retried |
    /// |-----------|---------|
    /// | Timeout | yes |
    /// | Transport error | yes |
    /// | HTTP 5xx | yes |
    /// | Other HTTP status | no |
    /// | Non-HTML content | no |
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Transport(_) => true,
            Self::Status(status) => *status >= 500,
            Self::NotHtml(_) => false,
        }
    }
}

/// Page loading capability consumed by the scheduler
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Loads a document, failing on any non-success status
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<LoadedPage, FetchError>;

    /// Checks that a URL answers with a success status
    ///
    /// The body is not read.
    async fn probe(&self, url: &str, timeout: Duration) -> Result<(), FetchError>;

    /// Releases held resources; called once when the run ends
    async fn close(&self) {}
}

/// Builds the User-Agent header value
///
/// Format: `CrawlerName/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use docs_mirror::config::UserAgentConfig;
/// use docs_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    async fn send(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response)
    }
}

fn classify_error(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Transport(error.to_string())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<LoadedPage, FetchError> {
        let response = self.send(url, timeout).await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        // A missing Content-Type is given the benefit of the doubt
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.is_empty() && !content_type.contains("html") {
            return Err(FetchError::NotHtml(content_type));
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        Ok(LoadedPage {
            final_url,
            status,
            body,
        })
    }

    async fn probe(&self, url: &str, timeout: Duration) -> Result<(), FetchError> {
        self.send(url, timeout).await.map(|_| ())
    }

    async fn close(&self) {
        tracing::debug!("HTTP fetcher closed");
    }
}

/// Attempt limit and timeout escalation for page fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_timeout: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            base_timeout: config.base_timeout(),
            max_attempts: config.max_attempts,
        }
    }

    /// Timeout of the given 1-based attempt: n times the base
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        self.base_timeout * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Fetches a URL, retrying transient failures with escalating timeouts
///
/// Attempts are sequential with no delay between them beyond the timeout
/// itself. Non-retryable errors are returned immediately.
pub async fn fetch_with_retry<F>(
    fetcher: &F,
    url: &str,
    policy: &RetryPolicy,
) -> Result<LoadedPage, FetchError>
where
    F: PageFetcher + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let timeout = policy.timeout_for(attempt);
        match fetcher.fetch(url, timeout).await {
            Ok(page) => return Ok(page),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                tracing::warn!(
                    "Attempt {}/{} for {} failed: {}; retrying",
                    attempt,
                    max_attempts,
                    url,
                    e
                );
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
