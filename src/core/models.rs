//! Core data models for the briefing pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Account
// =============================================================================

/// A configured customer account.
///
/// Immutable once loaded from config; passed by reference through the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Account {
    /// Display name used in the briefing.
    pub name: String,
    /// Billing/org identifier understood by the financial RPC agent.
    pub billing_id: String,
    /// Name of the account's revenue view in the BI provider, when it
    /// differs from `name`.
    #[serde(default)]
    pub bi_alias: Option<String>,
    /// Organization identifier in the ticketing provider. Absent means the
    /// account has no support presence and ticket collection is skipped.
    #[serde(default)]
    pub ticketing_org: Option<String>,
}

impl Account {
    /// The name to look up in the BI provider.
    #[must_use]
    pub fn bi_name(&self) -> &str {
        self.bi_alias.as_deref().unwrap_or(&self.name)
    }
}

// =============================================================================
// Revenue
// =============================================================================

/// Which provider ultimately supplied the revenue data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenueSource {
    /// The BI provider (preferred).
    Primary,
    /// The financial RPC agent.
    Fallback,
    /// No provider produced a usable payload.
    None,
}

impl RevenueSource {
    /// Label used in the briefing's data-lineage disclosure.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "BI provider",
            Self::Fallback => "financial agent",
            Self::None => "unavailable",
        }
    }
}

/// Revenue data with provenance.
///
/// Produced exactly once per account per run; `source` is recorded even when
/// every provider failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueResult {
    pub source: RevenueSource,
    /// Opaque provider payload (JSON or free text), handed to the renderer
    /// as-is.
    pub raw: Option<String>,
}

impl RevenueResult {
    /// A result recording that no provider supplied data.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            source: RevenueSource::None,
            raw: None,
        }
    }
}

// =============================================================================
// Tickets
// =============================================================================

/// Ticket records accumulated across result pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketSet {
    records: Vec<serde_json::Value>,
    /// Whether collection stopped early on a page fetch failure.
    pub truncated: bool,
}

impl TicketSet {
    /// Append one page of results.
    pub fn extend_page(&mut self, page: Vec<serde_json::Value>) {
        self.records.extend(page);
    }

    /// Number of accumulated records.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Accumulated records, in collection order.
    #[must_use]
    pub fn records(&self) -> &[serde_json::Value] {
        &self.records
    }
}

// =============================================================================
// Billing facts
// =============================================================================

/// Tri-state signal extracted from free text.
///
/// `Unknown` is a first-class outcome: the absence of an affirmative or
/// negative term is not the same as an explicit "disabled".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Signal {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unknown => "unknown",
        }
    }
}

/// Typed billing facts extracted from the financial agent's answers.
///
/// Each field is independently optional; partial success is the expected
/// case and never aborts the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingFacts {
    pub balance: Option<f64>,
    pub credit_limit: Option<f64>,
    pub payment_method: Option<String>,
    pub current_month_usage: Option<f64>,
    pub next_month_mrc: Option<f64>,
    pub daily_run_rate: Option<f64>,
    pub auto_recharge: Signal,
    pub contract_end: Option<NaiveDate>,
}

// =============================================================================
// Account record
// =============================================================================

/// Consolidated per-account record handed to the renderer.
///
/// Produced exactly once per processed account, even when every sub-fetch
/// failed; an all-unknown record is a valid, reportable outcome.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRecord {
    pub account: Account,
    pub revenue: RevenueResult,
    pub tickets: TicketSet,
    pub billing: BillingFacts,
    pub risks: crate::core::risk::RiskAssessment,
    pub generated_at: DateTime<Utc>,
}
