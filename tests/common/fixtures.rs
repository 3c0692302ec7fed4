//! Test data factories.
#![allow(dead_code)]
//!
//! Builders for accounts, fast-retry transports, and realistic provider
//! response payloads, shared across the integration tests.

use std::time::Duration;

use serde_json::{Value, json};

use abrief::core::http::{RetryPolicy, Transport};
use abrief::core::models::Account;
use abrief::core::session::{BiCredentials, BiSession};

/// A retry policy with millisecond delays so retry paths run in test time.
#[must_use]
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(10),
        backoff_multiplier: 2,
        connect_timeout: Duration::from_secs(2),
        total_timeout: Duration::from_secs(5),
    }
}

/// A transport using [`fast_policy`].
#[must_use]
pub fn fast_transport() -> Transport {
    Transport::new(fast_policy()).expect("transport build")
}

/// A typical configured account.
#[must_use]
pub fn account() -> Account {
    Account {
        name: "Acme".to_string(),
        billing_id: "ACME-001".to_string(),
        bi_alias: None,
        ticketing_org: Some("acme".to_string()),
    }
}

/// BI credentials pointing at a mock server. `secret: None` makes the
/// session unavailable without any network traffic.
#[must_use]
pub fn bi_credentials(server: &str, secret: Option<&str>) -> BiCredentials {
    BiCredentials {
        server: server.trim_end_matches('/').to_string(),
        site: "corp".to_string(),
        api_version: "3.19".to_string(),
        token_name: "briefing-bot".to_string(),
        secret: secret.map(str::to_string),
    }
}

/// A session against a mock server with complete credentials.
#[must_use]
pub fn bi_session(server: &str, transport: Transport) -> BiSession {
    BiSession::new(bi_credentials(server, Some("s3cret")), transport)
}

/// A BI sign-in response body carrying a token and tenant-site id.
#[must_use]
pub fn signin_body(token: &str, site_id: &str) -> Value {
    json!({
        "credentials": {
            "token": token,
            "site": { "id": site_id, "contentUrl": "corp" }
        }
    })
}

/// A BI views listing with one matching view.
#[must_use]
pub fn views_body() -> Value {
    json!({
        "views": {
            "view": [{ "id": "view-7", "name": "Acme Revenue" }]
        }
    })
}

/// One ticket search page. `start_id` keeps ids unique across pages so
/// duplicate detection is meaningful; `next` is the absolute cursor link.
#[must_use]
pub fn search_page(start_id: u64, count: u64, next: Option<&str>) -> Value {
    let results: Vec<Value> = (start_id..start_id + count)
        .map(|id| json!({ "id": id, "subject": format!("ticket {id}"), "status": "open" }))
        .collect();
    json!({
        "results": results,
        "links": { "next": next },
        "meta": { "has_more": next.is_some() }
    })
}

/// An RPC agent response with the answer in the artifact parts.
#[must_use]
pub fn rpc_answer(text: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": "resp-1",
        "result": {
            "artifacts": [{ "parts": [{ "kind": "text", "text": text }] }],
            "status": { "state": "completed" }
        }
    })
}
