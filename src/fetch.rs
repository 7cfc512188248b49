//! Page fetching with exponential backoff retry logic.
//!
//! # Architecture
//!
//! - [`Fetch`]: core trait for downloading a page body
//! - [`HttpFetcher`]: `reqwest`-backed implementation sharing one pooled client
//! - [`RetryFetch`]: decorator that retries transient failures of any [`Fetch`]
//!
//! # Retry Strategy
//!
//! Only transient failures are retried (see [`FetchError::is_transient`]).
//! The delay before retry `n` is:
//!
//! ```text
//! delay = min(base_delay * 2^(n-1), max_delay) + random_jitter(0..250ms)
//! ```

use crate::config::Settings;
use crate::error::{FetchError, PipelineError};
use rand::{Rng, rng};
use std::fmt;
use std::future::Future;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Download a page body as text.
///
/// Implementations are shared read-only across concurrent fetches.
pub trait Fetch {
    /// Fetch `url`, sending `user_agent` when one is given.
    fn fetch(
        &self,
        url: &str,
        user_agent: Option<&str>,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// HTTP fetcher backed by a single connection-pooling [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build the client.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Applied to each whole request, connect through body
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the TLS backend cannot be initialized.
    pub fn new(timeout: StdDuration) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str, user_agent: Option<&str>) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let mut request = self.client.get(url);
        if let Some(ua) = user_agent {
            request = request.header(reqwest::header::USER_AGENT, ua);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Pages are decoded as UTF-8 regardless of the declared charset.
        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`Fetch`] implementation.
pub struct RetryFetch<T> {
    /// The underlying fetcher.
    inner: T,
    /// Retries allowed after the first attempt.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Upper bound for the exponential part of the delay.
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: Fetch,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration, max_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay,
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(31) as u32;
        let mut delay = self.base_delay.saturating_mul(1u32 << shift);
        if delay > self.max_delay {
            delay = self.max_delay;
        }
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Fetch for RetryFetch<T>
where
    T: Fetch + Sync,
{
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str, user_agent: Option<&str>) -> Result<String, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.fetch(url, user_agent).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if !e.is_transient() || attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            transient = e.is_transient(),
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "fetch() giving up"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Build the production fetcher: pooled HTTP client wrapped in retry logic.
pub fn build_fetcher(settings: &Settings) -> Result<RetryFetch<HttpFetcher>, PipelineError> {
    let http = HttpFetcher::new(settings.request_timeout())?;
    Ok(RetryFetch::new(
        http,
        settings.max_retries,
        settings.backoff_base(),
        settings.max_backoff(),
    ))
}
