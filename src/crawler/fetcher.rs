//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client from the `[http]` settings
//! - Spacing consecutive requests by a minimum delay
//! - Retrying transient failures with exponential backoff
//! - Classifying failures into `FetchError`s

use crate::config::HttpConfig;
use crate::{ConfigError, FetchError, FetchResult, ScrapeError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Bounded retry schedule for a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,

    /// Delay before the first retry; doubled for each further retry
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Builds the policy from the `[http]` settings
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            retries: config.retries,
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (zero-based)
    ///
    /// `backoff * 2^retry`, saturating instead of overflowing.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The `[http]` settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(ScrapeError)` - Invalid header value or client build failure
pub fn build_http_client(config: &HttpConfig) -> Result<Client, ScrapeError> {
    let mut headers = HeaderMap::new();
    let accept_language = HeaderValue::from_str(&config.accept_language).map_err(|_| {
        ConfigError::Validation(format!(
            "accept-language '{}' is not a valid header value",
            config.accept_language
        ))
    })?;
    headers.insert(ACCEPT_LANGUAGE, accept_language);

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Sequential page fetcher shared by the walker and the detail fetcher
///
/// Requests are spaced by at least the configured delay. Only one caller
/// drives the fetcher at a time; the lock just records the last request.
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Fetcher {
    /// Creates a fetcher from the `[http]` settings
    pub fn new(config: &HttpConfig) -> Result<Self, ScrapeError> {
        Ok(Self::with_client(
            build_http_client(config)?,
            RetryPolicy::from_config(config),
            Duration::from_millis(config.request_delay_ms),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, policy: RetryPolicy, request_delay: Duration) -> Self {
        Self {
            client,
            policy,
            request_delay,
            last_request: Mutex::new(None),
        }
    }

    /// Fetches a URL and returns its body
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Return body |
    /// | HTTP 408, 429, 5xx | Retry with backoff |
    /// | Timeout, connection error | Retry with backoff |
    /// | Any other status | Fail immediately |
    ///
    /// When the retry budget is spent the last error is wrapped in
    /// `FetchError::GaveUp`.
    pub async fn get_text(&self, url: &str) -> FetchResult<String> {
        let max_attempts = self.policy.max_attempts();
        let mut retry = 0;

        loop {
            self.throttle().await;

            let error = match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) => e,
            };

            if !error.is_retryable() {
                tracing::warn!("{}", error);
                return Err(error);
            }

            if retry >= self.policy.retries {
                return Err(FetchError::GaveUp {
                    url: url.to_string(),
                    attempts: max_attempts,
                    last: Box::new(error),
                });
            }

            let delay = self.policy.delay_for(retry);
            tracing::warn!(
                "{} (attempt {}/{}), retrying in {}ms",
                error,
                retry + 1,
                max_attempts,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            retry += 1;
        }
    }

    async fn get_once(&self, url: &str) -> FetchResult<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }

    /// Waits until the minimum delay since the previous request has passed
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.request_delay {
                tokio::time::sleep(self.request_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
