//! BI provider revenue read.
//!
//! Reads the account's revenue view through an authenticated session. The
//! session layer owns token lifecycle and 401 handling; this module only
//! shapes the endpoint and judges whether the payload is usable.

use crate::core::models::Account;
use crate::core::session::BiSession;
use crate::error::{AbriefError, Result};

/// Fetch the raw revenue payload for an account.
///
/// # Errors
///
/// Propagates session and transport errors, and returns
/// [`AbriefError::EmptyPayload`] when a 2xx read carries nothing usable so
/// the revenue resolver can move on to the fallback source.
pub async fn fetch_revenue(session: &mut BiSession, account: &Account) -> Result<String> {
    let endpoint = format!(
        "views?filter=name:eq:{}",
        account.bi_name().replace(' ', "%20")
    );
    let payload = session.get(&endpoint).await?;

    if !payload_is_usable(&payload) {
        return Err(AbriefError::EmptyPayload {
            provider: "bi".to_string(),
        });
    }
    Ok(payload)
}

/// A payload is usable when it is non-empty and, if it parses as the view
/// list JSON, actually lists at least one view.
fn payload_is_usable(payload: &str) -> bool {
    if payload.trim().is_empty() {
        return false;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(payload) {
        if let Some(views) = value["views"]["view"].as_array() {
            return !views.is_empty();
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payloads_are_unusable() {
        assert!(!payload_is_usable(""));
        assert!(!payload_is_usable("   \n"));
    }

    #[test]
    fn empty_view_list_is_unusable() {
        assert!(!payload_is_usable(r#"{"views": {"view": []}}"#));
        assert!(payload_is_usable(
            r#"{"views": {"view": [{"id": "v1", "name": "Acme Revenue"}]}}"#
        ));
    }

    #[test]
    fn non_json_text_counts_as_usable() {
        assert!(payload_is_usable("month,revenue\n2026-01,1200"));
    }
}
