//! BI provider session management.
//!
//! Owns the bearer token and tenant-site id exclusively. The session moves
//! between unauthenticated and authenticated, and is invalidated on a 401
//! or on the aggregator's cadence trigger. A read performs at most one
//! re-authentication and one retry; transient transport errors were already
//! retried below this layer.

use reqwest::StatusCode;
use serde_json::json;

use crate::core::config::{self, BiProviderConfig};
use crate::core::http::Transport;
use crate::error::{AbriefError, Result};

/// Credentials and connection settings for the BI provider.
///
/// The token secret comes only from the environment.
#[derive(Debug, Clone)]
pub struct BiCredentials {
    pub server: String,
    pub site: String,
    pub api_version: String,
    pub token_name: String,
    pub secret: Option<String>,
}

impl BiCredentials {
    /// Build credentials from config, pulling the secret from the env.
    #[must_use]
    pub fn from_config(cfg: &BiProviderConfig) -> Self {
        Self {
            server: cfg.server.trim_end_matches('/').to_string(),
            site: cfg.site.clone(),
            api_version: cfg.api_version.clone(),
            token_name: cfg.token_name.clone(),
            secret: config::secret_from_env(config::BI_SECRET_ENV),
        }
    }

    /// Whether authentication is even worth attempting.
    #[must_use]
    pub fn complete(&self) -> bool {
        !self.token_name.is_empty() && self.secret.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Token and site id returned by a successful sign-in.
#[derive(Debug, Clone)]
struct AuthTicket {
    token: String,
    site_id: String,
}

/// BI session manager.
pub struct BiSession {
    creds: BiCredentials,
    transport: Transport,
    ticket: Option<AuthTicket>,
}

impl BiSession {
    #[must_use]
    pub const fn new(creds: BiCredentials, transport: Transport) -> Self {
        Self {
            creds,
            transport,
            ticket: None,
        }
    }

    /// Whether a token is currently held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.ticket.is_some()
    }

    /// Whether the session could plausibly authenticate (credentials
    /// present). The revenue resolver consults this before spending any
    /// network budget on the primary source.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.is_authenticated() || self.creds.complete()
    }

    /// Drop the held token, returning to the unauthenticated state.
    pub fn invalidate(&mut self) {
        self.ticket = None;
    }

    /// Sign in and store the bearer token + tenant-site id.
    ///
    /// Fast-fails without a network call when credentials are absent, so
    /// the fallback path triggers without wasting the retry budget.
    ///
    /// # Errors
    ///
    /// Returns [`AbriefError::AuthUnavailable`] on any failure; callers
    /// degrade rather than abort.
    pub async fn authenticate(&mut self) -> Result<()> {
        if !self.creds.complete() {
            return Err(AbriefError::AuthUnavailable {
                reason: format!(
                    "credentials not configured (set {})",
                    config::BI_SECRET_ENV
                ),
            });
        }

        let url = format!(
            "{}/api/{}/auth/signin",
            self.creds.server, self.creds.api_version
        );
        let body = json!({
            "credentials": {
                "personalAccessTokenName": self.creds.token_name,
                "personalAccessTokenSecret": self.creds.secret,
                "site": { "contentUrl": self.creds.site },
            }
        });

        let response = self
            .transport
            .execute(self.transport.client().post(&url).json(&body))
            .await
            .map_err(|e| AbriefError::AuthUnavailable {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(AbriefError::AuthUnavailable {
                reason: format!("sign-in returned HTTP {}", response.status()),
            });
        }

        let payload: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| AbriefError::AuthUnavailable {
                    reason: format!("sign-in response unreadable: {e}"),
                })?;

        // A 2xx sign-in without a token is still a failure.
        let token = payload["credentials"]["token"]
            .as_str()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AbriefError::AuthUnavailable {
                reason: "sign-in response missing token".to_string(),
            })?;
        let site_id = payload["credentials"]["site"]["id"]
            .as_str()
            .unwrap_or_default();

        tracing::debug!(site_id, "BI session established");
        self.ticket = Some(AuthTicket {
            token: token.to_string(),
            site_id: site_id.to_string(),
        });
        Ok(())
    }

    /// Issue an authenticated read of a site-scoped endpoint.
    ///
    /// On HTTP 401 specifically, re-authenticates once and retries the read
    /// once. Any other failure is returned as-is; the transport already
    /// retried transient errors.
    ///
    /// # Errors
    ///
    /// Returns an error when the session is unauthenticated, the transport
    /// exhausted its retries, or a 401 persisted past re-authentication.
    pub async fn get(&mut self, endpoint: &str) -> Result<String> {
        let response = self.issue(endpoint).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!(endpoint, "401 during read, re-authenticating once");
            self.invalidate();
            self.authenticate().await?;
            let retry = self.issue(endpoint).await?;
            if retry.status() == StatusCode::UNAUTHORIZED {
                self.invalidate();
                return Err(AbriefError::Unauthorized {
                    endpoint: endpoint.to_string(),
                });
            }
            return Self::read_body(retry).await;
        }
        Self::read_body(response).await
    }

    async fn issue(&self, endpoint: &str) -> Result<reqwest::Response> {
        let Some(ticket) = &self.ticket else {
            return Err(AbriefError::AuthUnavailable {
                reason: "no active session".to_string(),
            });
        };
        let url = format!(
            "{}/api/{}/sites/{}/{}",
            self.creds.server, self.creds.api_version, ticket.site_id, endpoint
        );
        self.transport
            .execute(
                self.transport
                    .client()
                    .get(&url)
                    .header("X-Auth-Token", &ticket.token),
            )
            .await
    }

    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(AbriefError::Network(format!("HTTP {status} from BI read")));
        }
        response
            .text()
            .await
            .map_err(|e| AbriefError::ParseResponse(e.to_string()))
    }
}
