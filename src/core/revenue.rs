//! Revenue source resolution.
//!
//! An ordered plan of revenue sources, each with an availability check,
//! evaluated in priority order and short-circuiting on the first usable
//! payload. Provenance is recorded in the result regardless of outcome so
//! the briefing can disclose data lineage; the fallback is consulted at
//! most once per account per run.

use crate::core::models::{Account, RevenueResult, RevenueSource};
use crate::core::session::BiSession;
use crate::error::{AbriefError, Result};
use crate::providers::{bi, rpc_agent::RpcAgentClient};

/// One entry in the ordered source plan.
#[derive(Debug, Clone, Copy)]
pub struct SourceStrategy {
    pub source: RevenueSource,
    pub id: &'static str,
}

/// Sources in priority order: the BI view first, the RPC agent as fallback.
pub const SOURCE_PLAN: &[SourceStrategy] = &[
    SourceStrategy {
        source: RevenueSource::Primary,
        id: "bi-view",
    },
    SourceStrategy {
        source: RevenueSource::Fallback,
        id: "rpc-agent",
    },
];

/// The structured question the fallback asks the financial agent.
#[must_use]
pub fn fallback_question(account: &Account) -> String {
    format!(
        "Provide a month-by-month revenue breakdown for account {} over the \
         last 6 months, including monthly totals.",
        account.billing_id
    )
}

/// Resolve revenue for one account.
///
/// Never fails: when every source is unavailable or unusable the result
/// records [`RevenueSource::None`] and the run continues.
pub async fn resolve(
    session: &mut BiSession,
    rpc: &RpcAgentClient,
    account: &Account,
) -> RevenueResult {
    for strategy in SOURCE_PLAN {
        if !is_available(strategy, session, rpc) {
            tracing::debug!(
                account = %account.name,
                strategy = strategy.id,
                "revenue source not available, skipping"
            );
            continue;
        }

        match fetch(strategy, session, rpc, account).await {
            Ok(raw) => {
                tracing::info!(
                    account = %account.name,
                    strategy = strategy.id,
                    "revenue resolved"
                );
                return RevenueResult {
                    source: strategy.source,
                    raw: Some(raw),
                };
            }
            Err(e) => {
                tracing::warn!(
                    account = %account.name,
                    strategy = strategy.id,
                    error = %e,
                    "revenue source failed"
                );
            }
        }
    }

    tracing::warn!(account = %account.name, "no revenue data available");
    RevenueResult::unavailable()
}

fn is_available(strategy: &SourceStrategy, session: &BiSession, rpc: &RpcAgentClient) -> bool {
    match strategy.id {
        "bi-view" => session.is_available(),
        "rpc-agent" => rpc.is_configured(),
        _ => false,
    }
}

async fn fetch(
    strategy: &SourceStrategy,
    session: &mut BiSession,
    rpc: &RpcAgentClient,
    account: &Account,
) -> Result<String> {
    match strategy.id {
        "bi-view" => {
            if !session.is_authenticated() {
                session.authenticate().await?;
            }
            bi::fetch_revenue(session, account).await
        }
        "rpc-agent" => rpc
            .query(&fallback_question(account))
            .await
            .ok_or_else(|| AbriefError::EmptyPayload {
                provider: "rpc-agent".to_string(),
            }),
        other => Err(AbriefError::EmptyPayload {
            provider: other.to_string(),
        }),
    }
}
