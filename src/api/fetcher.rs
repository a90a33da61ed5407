use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time;
use tracing::{error, warn};

use super::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::core::config::RetryConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited (429) after {attempts} attempts")]
    RateLimited { attempts: u32 },
    #[error("HTTP {status}")]
    Status { status: StatusCode },
    #[error("network failure after {attempts} attempts: {source}")]
    Network {
        attempts: u32,
        #[source]
        source: TransportError,
    },
}

/// Linear backoff: attempt `n` waits `n * base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retry_limit: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_limit: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            retry_limit: config.retry_limit,
            base_delay: config.base_delay(),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    fn should_retry(&self, attempt: u32) -> bool {
        attempt <= self.retry_limit
    }
}

/// Sole gateway for outbound HTTP. Only 429 and transport failures are retried;
/// any other non-success status gives up on the first response.
pub struct ResilientFetcher {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
}

impl ResilientFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut attempt = 1;

        loop {
            match self.transport.send(request).await {
                Ok(response) if response.status == StatusCode::TOO_MANY_REQUESTS => {
                    if self.policy.should_retry(attempt) {
                        let delay = self.policy.delay_for(attempt);
                        warn!(
                            "⛔ Rate limit (429) on {}. Retry #{} in {:?}...",
                            request.url, attempt, delay
                        );
                        time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    error!(
                        "❌ 429 after {} retries on {}. Skipping.",
                        self.policy.retry_limit, request.url
                    );
                    return Err(FetchError::RateLimited { attempts: attempt });
                }
                Ok(response) if !response.status.is_success() => {
                    error!("❌ Fetch error {} on {}", response.status, request.url);
                    return Err(FetchError::Status {
                        status: response.status,
                    });
                }
                Ok(response) => return Ok(response),
                Err(err) => {
                    if self.policy.should_retry(attempt) {
                        let delay = self.policy.delay_for(attempt);
                        warn!(
                            "⚠ Network error on {}: {}. Retry #{} in {:?}...",
                            request.url, err, attempt, delay
                        );
                        time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    error!(
                        "❌ Network failed after {} retries on {}: {}",
                        self.policy.retry_limit, request.url, err
                    );
                    return Err(FetchError::Network {
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }
    }
}
