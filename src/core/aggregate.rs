//! Per-account orchestration.
//!
//! Processes accounts one at a time in configured order, each account's
//! sub-fetches issued sequentially: revenue resolution, ticket collection,
//! then three independent billing sub-queries. Every account produces
//! exactly one record, even when every sub-fetch fails; an all-unknown
//! record is a valid, reportable outcome.

use chrono::{Duration, NaiveDate, Utc};

use crate::core::extract::{self, BillingAnswers};
use crate::core::models::{Account, AccountRecord, TicketSet};
use crate::core::revenue;
use crate::core::risk;
use crate::core::session::BiSession;
use crate::providers::rpc_agent::RpcAgentClient;
use crate::providers::ticketing::TicketingClient;

/// The three billing sub-queries, in issue order.
#[must_use]
pub fn billing_questions(account: &Account) -> [String; 3] {
    let id = &account.billing_id;
    [
        format!(
            "What is the current balance, credit limit, and payment method \
             on file for account {id}?"
        ),
        format!(
            "What is the current month usage, next month MRC, and daily run \
             rate for account {id}?"
        ),
        format!(
            "Does account {id} have auto-recharge enabled, and what is its \
             contract end date?"
        ),
    ]
}

/// Orchestrates provider clients across the configured accounts.
pub struct Aggregator {
    session: BiSession,
    ticketing: TicketingClient,
    rpc: RpcAgentClient,
    lookback_days: i64,
    reauth_every: usize,
    processed: usize,
}

impl Aggregator {
    #[must_use]
    pub const fn new(
        session: BiSession,
        ticketing: TicketingClient,
        rpc: RpcAgentClient,
        lookback_days: i64,
        reauth_every: usize,
    ) -> Self {
        Self {
            session,
            ticketing,
            rpc,
            lookback_days,
            reauth_every,
            processed: 0,
        }
    }

    /// Process all accounts in order, one record each.
    pub async fn run(&mut self, accounts: &[Account]) -> Vec<AccountRecord> {
        let mut records = Vec::with_capacity(accounts.len());
        for account in accounts {
            records.push(self.process_account(account).await);
        }
        records
    }

    /// Process one account into a consolidated record.
    pub async fn process_account(&mut self, account: &Account) -> AccountRecord {
        self.cadence_reauth().await;
        tracing::info!(account = %account.name, "processing account");

        let revenue = revenue::resolve(&mut self.session, &self.rpc, account).await;

        let tickets = if let Some(org) = &account.ticketing_org {
            self.ticketing.collect(org, self.since_date()).await
        } else {
            tracing::debug!(account = %account.name, "no ticketing org configured, skipping");
            TicketSet::default()
        };

        // Each query is its own round trip so one failure cannot block the
        // other two.
        let [balance_q, usage_q, contract_q] = billing_questions(account);
        let answers = BillingAnswers {
            balance_credit: self.rpc.query(&balance_q).await,
            usage_forecast: self.rpc.query(&usage_q).await,
            contract_terms: self.rpc.query(&contract_q).await,
        };
        let billing = extract::billing_facts(&answers);

        let risks = risk::derive(&billing, &tickets);

        self.processed += 1;
        AccountRecord {
            account: account.clone(),
            revenue,
            tickets,
            billing,
            risks,
            generated_at: Utc::now(),
        }
    }

    /// Proactive re-authentication after every `reauth_every` processed
    /// accounts, independent of 401s, to bound token lifetime exposure.
    /// Refresh failure degrades the session rather than aborting the run.
    async fn cadence_reauth(&mut self) {
        if self.processed == 0 || self.processed % self.reauth_every != 0 {
            return;
        }
        tracing::info!(processed = self.processed, "cadence BI re-authentication");
        self.session.invalidate();
        if let Err(e) = self.session.authenticate().await {
            tracing::warn!(error = %e, "cadence re-authentication failed, session degraded");
        }
    }

    fn since_date(&self) -> NaiveDate {
        Utc::now().date_naive() - Duration::days(self.lookback_days)
    }
}
