//! Notification sink.
//!
//! Posts the finished briefing text to a chat channel with a bearer token.
//! The sink receives the rendered document and a channel id and nothing
//! else; a missing token or a failed post degrades with a warning.

use serde_json::json;

use crate::core::config;
use crate::core::http::Transport;
use crate::error::{AbriefError, Result};

/// Default chat post endpoint.
pub const DEFAULT_POST_URL: &str = "https://slack.com/api/chat.postMessage";

/// Chat notification client.
pub struct Notifier {
    transport: Transport,
    url: String,
    token: Option<String>,
}

impl Notifier {
    /// Build with the default endpoint; the bot token comes from the env.
    #[must_use]
    pub fn from_env(transport: Transport) -> Self {
        Self::new(
            DEFAULT_POST_URL.to_string(),
            config::secret_from_env(config::NOTIFY_TOKEN_ENV),
            transport,
        )
    }

    #[must_use]
    pub const fn new(url: String, token: Option<String>, transport: Transport) -> Self {
        Self {
            transport,
            url,
            token,
        }
    }

    /// Post `text` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing token or a failed post; callers log a
    /// warning and continue, since notification is a sink, not a stage.
    pub async fn post(&self, channel: &str, text: &str) -> Result<()> {
        let Some(token) = &self.token else {
            return Err(AbriefError::MissingSecret {
                name: config::NOTIFY_TOKEN_ENV.to_string(),
            });
        };

        let body = json!({ "channel": channel, "text": text });
        let response = self
            .transport
            .execute(
                self.transport
                    .client()
                    .post(&self.url)
                    .bearer_auth(token)
                    .json(&body),
            )
            .await?;

        if !response.status().is_success() {
            return Err(AbriefError::Network(format!(
                "notification post returned HTTP {}",
                response.status()
            )));
        }
        tracing::info!(channel, "briefing posted");
        Ok(())
    }
}
