//! Ticketing provider: cursor-paginated ticket collection.
//!
//! Support data is optional and never blocking: missing credentials yield an
//! empty set immediately, and a failed page fetch truncates collection at
//! the last good page instead of discarding everything gathered so far.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::config::{self, TicketingConfig};
use crate::core::http::Transport;
use crate::core::models::TicketSet;

/// Fixed page size for search export requests.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<serde_json::Value>,
    #[serde(default)]
    links: Option<PageLinks>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
struct PageLinks {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    has_more: Option<bool>,
}

/// Client for the ticketing provider's search export API.
pub struct TicketingClient {
    transport: Transport,
    base_url: String,
    email: String,
    token: Option<String>,
}

impl TicketingClient {
    /// Build from config; the API token comes from the environment.
    #[must_use]
    pub fn from_config(cfg: &TicketingConfig, transport: Transport) -> Self {
        Self::new(
            format!("https://{}.zendesk.com", cfg.subdomain),
            cfg.email.clone(),
            config::secret_from_env(config::TICKETING_TOKEN_ENV),
            transport,
        )
    }

    #[must_use]
    pub const fn new(
        base_url: String,
        email: String,
        token: Option<String>,
        transport: Transport,
    ) -> Self {
        Self {
            transport,
            base_url,
            email,
            token,
        }
    }

    /// Collect all tickets for an organization created after `since`.
    ///
    /// Walks the provider's `links.next` cursor until it is absent, empty,
    /// or the literal `"null"`, merging `results` across pages. Always
    /// returns a set; failures truncate rather than error.
    pub async fn collect(&self, org: &str, since: NaiveDate) -> TicketSet {
        let mut set = TicketSet::default();

        let Some(token) = &self.token else {
            tracing::warn!("ticketing token not set, skipping ticket collection");
            return set;
        };

        let query = format!("type:ticket organization:{org} created>{since}");
        let first = format!("{}/api/v2/search/export.json", self.base_url);
        let mut next_url: Option<String> = None;
        let mut page_number = 0u32;

        loop {
            page_number += 1;
            let request = match &next_url {
                // The cursor link is absolute and already carries the query.
                Some(url) => self.transport.client().get(url),
                None => self.transport.client().get(&first).query(&[
                    ("query", query.as_str()),
                    ("filter[type]", "ticket"),
                    ("page[size]", &PAGE_SIZE.to_string()),
                ]),
            };
            let request = request.basic_auth(format!("{}/token", self.email), Some(token));

            let response = match self.transport.execute(request).await {
                Ok(response) if response.status().is_success() => response,
                Ok(response) => {
                    tracing::warn!(
                        page = page_number,
                        status = %response.status(),
                        "ticket page fetch failed, truncating collection"
                    );
                    set.truncated = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        page = page_number,
                        error = %e,
                        "ticket page fetch failed, truncating collection"
                    );
                    set.truncated = true;
                    break;
                }
            };

            let page: SearchPage = match response.json().await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(page = page_number, error = %e, "unparseable ticket page");
                    set.truncated = true;
                    break;
                }
            };

            tracing::debug!(page = page_number, results = page.results.len(), "ticket page");
            set.extend_page(page.results);

            if page.meta.is_some_and(|m| m.has_more == Some(false)) {
                break;
            }
            match page.links.and_then(|l| l.next).filter(|n| !n.is_empty() && n != "null") {
                Some(next) => next_url = Some(next),
                None => break,
            }
        }

        tracing::info!(org, count = set.count(), truncated = set.truncated, "tickets collected");
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_token_yields_empty_set_without_network() {
        let transport = Transport::with_defaults().expect("transport");
        let client = TicketingClient::new(
            "https://example.zendesk.com".to_string(),
            "bot@example.com".to_string(),
            None,
            transport,
        );
        let since = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid");
        let set = client.collect("acme", since).await;
        assert!(set.is_empty());
        assert!(!set.truncated);
    }
}
