//! Financial RPC agent client.
//!
//! Issues single-shot natural-language questions over a JSON-RPC-style
//! envelope and digs the textual answer out of the response. Three
//! independent billing round trips are issued per account, each a separate
//! call so a failure in one does not block the others. No retries here
//! beyond the transport layer.

use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::core::http::Transport;

/// Client for the financial agent's RPC endpoint.
pub struct RpcAgentClient {
    transport: Transport,
    url: Option<String>,
}

impl RpcAgentClient {
    /// `url` absent means the agent is unconfigured; queries degrade to
    /// "no answer".
    #[must_use]
    pub const fn new(url: Option<String>, transport: Transport) -> Self {
        Self { transport, url }
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Ask one natural-language question; `None` on any failure.
    pub async fn query(&self, question: &str) -> Option<String> {
        let Some(url) = &self.url else {
            tracing::debug!("RPC agent not configured, skipping query");
            return None;
        };

        let message_id = new_message_id();
        let envelope = json!({
            "jsonrpc": "2.0",
            "id": message_id,
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "messageId": message_id,
                    "parts": [{ "kind": "text", "text": question }],
                }
            }
        });

        let response = match self
            .transport
            .execute(self.transport.client().post(url).json(&envelope))
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "RPC agent returned an error status");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "RPC agent query failed");
                return None;
            }
        };

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable RPC agent response");
                return None;
            }
        };

        let answer = extract_answer(&body);
        if answer.is_none() {
            tracing::warn!(message_id, "RPC agent response carried no answer text");
        }
        answer
    }
}

/// Unique message id: millisecond timestamp plus a random suffix.
fn new_message_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

/// Extract the answer text from the first populated of several nested
/// locations, in priority order. Later locations are ignored once one
/// matches.
#[must_use]
pub fn extract_answer(body: &Value) -> Option<String> {
    let result = &body["result"];

    // 1. Artifact parts.
    if let Some(artifacts) = result["artifacts"].as_array() {
        for artifact in artifacts {
            if let Some(text) = parts_text(&artifact["parts"]) {
                return Some(text);
            }
        }
    }

    // 2. Status message parts.
    if let Some(text) = parts_text(&result["status"]["message"]["parts"]) {
        return Some(text);
    }

    // 3. Bare parts on the result itself.
    parts_text(&result["parts"])
}

/// Join the non-empty `text` fields of a parts array.
fn parts_text(parts: &Value) -> Option<String> {
    let texts: Vec<&str> = parts
        .as_array()?
        .iter()
        .filter_map(|part| part["text"].as_str())
        .filter(|text| !text.trim().is_empty())
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}
