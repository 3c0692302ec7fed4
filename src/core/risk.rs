//! Risk flag derivation.
//!
//! A pure function over billing facts and the ticket set. Rules are
//! independently evaluated and not mutually exclusive; the output order is
//! the display priority. A run with nothing flagged yields an explicit
//! no-significant-risks outcome, distinct from "not evaluated".

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::models::{BillingFacts, Signal, TicketSet};

/// Credit utilization percentage above which an account is flagged.
pub const HIGH_UTILIZATION_PCT: f64 = 80.0;

/// Ticket count above which the lookback window is flagged as high volume.
pub const TICKET_VOLUME_THRESHOLD: usize = 10;

/// A single derived risk signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RiskFlag {
    /// Credit utilization above [`HIGH_UTILIZATION_PCT`].
    HighCreditUtilization { pct: f64 },
    /// Auto-recharge explicitly disabled. An unknown signal does not flag.
    AutoRechargeDisabled,
    /// A contract end date is on record. Fires on any present date, however
    /// distant; readers judge proximity from the date itself.
    ContractRenewal { end: NaiveDate },
    /// Ticket volume above [`TICKET_VOLUME_THRESHOLD`] in the lookback
    /// window.
    HighTicketVolume { count: usize },
}

impl std::fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HighCreditUtilization { pct } => {
                write!(f, "credit utilization at {pct:.0}% of limit")
            }
            Self::AutoRechargeDisabled => write!(f, "auto-recharge is disabled"),
            Self::ContractRenewal { end } => {
                write!(f, "contract end date on record: {end} - review renewal timeline")
            }
            Self::HighTicketVolume { count } => {
                write!(f, "high support ticket volume: {count} in the lookback window")
            }
        }
    }
}

/// Outcome of risk evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RiskAssessment {
    /// Evaluation ran and found nothing to flag.
    NoSignificantRisks,
    /// One or more flags, in display priority order.
    Flagged { flags: Vec<RiskFlag> },
}

impl RiskAssessment {
    #[must_use]
    pub fn flags(&self) -> &[RiskFlag] {
        match self {
            Self::NoSignificantRisks => &[],
            Self::Flagged { flags } => flags,
        }
    }
}

/// Derive risk flags from billing facts and collected tickets.
#[must_use]
pub fn derive(facts: &BillingFacts, tickets: &TicketSet) -> RiskAssessment {
    let mut flags = Vec::new();

    // Utilization is skipped entirely when either value is unknown or the
    // limit is zero; a missing number is not evidence of risk.
    if let (Some(balance), Some(limit)) = (facts.balance, facts.credit_limit) {
        if limit != 0.0 {
            let pct = (balance / limit).abs() * 100.0;
            if pct > HIGH_UTILIZATION_PCT {
                flags.push(RiskFlag::HighCreditUtilization { pct });
            }
        }
    }

    if facts.auto_recharge == Signal::No {
        flags.push(RiskFlag::AutoRechargeDisabled);
    }

    if let Some(end) = facts.contract_end {
        flags.push(RiskFlag::ContractRenewal { end });
    }

    if tickets.count() > TICKET_VOLUME_THRESHOLD {
        flags.push(RiskFlag::HighTicketVolume {
            count: tickets.count(),
        });
    }

    if flags.is_empty() {
        RiskAssessment::NoSignificantRisks
    } else {
        RiskAssessment::Flagged { flags }
    }
}
