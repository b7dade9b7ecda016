//! Async page fetcher wrapping reqwest.
//!
//! One GET per call: follows redirects, enforces a timeout floor and
//! classifies failures. No retries; a failed fetch goes straight to the
//! degraded path.

use site_audit::FetchFailure;
use std::time::{Duration, Instant};
use thiserror::Error;

/// The network always gets at least this long, whatever the caller asks.
pub const MIN_FETCH_TIMEOUT_MS: u64 = 10_000;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Why a fetch produced no markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Client-side abort.
    #[error("timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
    /// The server answered with a non-success status.
    #[error("HTTP {status}")]
    HttpError { status: u16 },
    /// DNS, connect, TLS or body read failure.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl FetchError {
    /// The cause as reported on the degraded path.
    pub fn failure(&self) -> FetchFailure {
        match self {
            FetchError::Timeout { .. } => FetchFailure::Timeout,
            FetchError::HttpError { status } => FetchFailure::HttpError { status: *status },
            FetchError::NetworkError(_) => FetchFailure::NetworkError,
        }
    }
}

/// Markup of a successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub final_url: String,
    pub status: u16,
    pub body: String,
    pub elapsed_ms: u64,
}

pub type FetchOutcome = Result<FetchedPage, FetchError>;

/// Stateless page fetcher.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl Fetcher {
    /// Create a fetcher. Timeouts below [`MIN_FETCH_TIMEOUT_MS`] are raised to it.
    pub fn new(timeout_ms: u64) -> Self {
        let timeout_ms = timeout_ms.max(MIN_FETCH_TIMEOUT_MS);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client, timeout_ms }
    }

    /// Effective timeout after the floor was applied.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Fetch `url` once.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let started = Instant::now();
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpError {
                status: status.as_u16(),
            });
        }
        let final_url = resp.url().to_string();
        let body = resp.text().await.map_err(|e| self.classify(e))?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                after_ms: self.timeout_ms,
            }
        } else if let Some(status) = err.status() {
            FetchError::HttpError {
                status: status.as_u16(),
            }
        } else {
            FetchError::NetworkError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_floor() {
        assert_eq!(Fetcher::new(500).timeout_ms(), MIN_FETCH_TIMEOUT_MS);
        assert_eq!(Fetcher::new(30_000).timeout_ms(), 30_000);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::Timeout { after_ms: 10_000 }.to_string(),
            "timed out after 10000ms"
        );
        assert_eq!(FetchError::HttpError { status: 503 }.to_string(), "HTTP 503");
    }

    #[test]
    fn test_failure_keeps_classification() {
        assert_eq!(
            FetchError::HttpError { status: 404 }.failure(),
            FetchFailure::HttpError { status: 404 }
        );
        assert_eq!(FetchError::Timeout { after_ms: 1 }.failure(), FetchFailure::Timeout);
        assert_eq!(
            FetchError::NetworkError("refused".into()).failure(),
            FetchFailure::NetworkError
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let fetcher = Fetcher::new(0);
        let err = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, FetchError::NetworkError(_)), "{err:?}");
    }
}
