//! Backoff-retrying HTTP transport.
//!
//! The single choke point every outbound call passes through. Transient
//! failures are retried with exponential delay; after the attempt budget is
//! exhausted the transport returns the [`AbriefError::RequestFailed`]
//! sentinel, which downstream stages treat as "no data" rather than a
//! pipeline error. No caller performs its own retry loop.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};

use crate::error::{AbriefError, Result};

/// Retry and timeout configuration for one logical call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles (times `backoff_multiplier`)
    /// for each subsequent one.
    pub base_delay: Duration,
    pub backoff_multiplier: u32,
    /// Bound on establishing the connection, per attempt.
    pub connect_timeout: Duration,
    /// Bound on the whole request, per attempt.
    pub total_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            backoff_multiplier: 2,
            connect_timeout: Duration::from_secs(10),
            total_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given 1-based attempt: `base * multiplier^(attempt-1)`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * self.backoff_multiplier.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Shared HTTP transport with retry-on-transient-failure semantics.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    policy: RetryPolicy,
}

impl Transport {
    /// Build a transport with the given policy.
    ///
    /// # Errors
    ///
    /// Returns error if client construction fails.
    pub fn new(policy: RetryPolicy) -> Result<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(policy.connect_timeout)
            .timeout(policy.total_timeout)
            .user_agent(format!("abrief/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AbriefError::Network(e.to_string()))?;
        Ok(Self { client, policy })
    }

    /// Build a transport with the default policy.
    pub fn with_defaults() -> Result<Self> {
        Self::new(RetryPolicy::default())
    }

    /// The underlying client, for constructing requests.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute a request, retrying transient failures.
    ///
    /// Transport errors, 429, and 5xx responses are retried up to the
    /// attempt budget. Every other status, 401 included, is returned to the
    /// caller for inspection; the session layer owns 401 handling.
    ///
    /// # Errors
    ///
    /// Returns [`AbriefError::RequestFailed`] once all attempts are
    /// exhausted. Callers treat this as "no data", not as a reason to abort.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let mut last_error = String::new();

        for attempt in 1..=self.policy.max_attempts {
            let Some(req) = request.try_clone() else {
                return Err(AbriefError::Network(
                    "request body is not cloneable for retry".to_string(),
                ));
            };

            match req.send().await {
                Ok(response) if is_retryable_status(response.status()) => {
                    last_error = format!("HTTP {}", response.status());
                    tracing::warn!(attempt, status = %response.status(), "retryable response");
                }
                Ok(response) => return Ok(response),
                Err(e) => {
                    last_error = if e.is_timeout() {
                        AbriefError::Timeout(self.policy.total_timeout.as_secs()).to_string()
                    } else {
                        e.to_string()
                    };
                    tracing::warn!(attempt, error = %last_error, "request attempt failed");
                }
            }

            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.delay_after(attempt)).await;
            }
        }

        Err(AbriefError::RequestFailed {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }
}

/// Whether a status indicates a transient condition worth retrying.
fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
