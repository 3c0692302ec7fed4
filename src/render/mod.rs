//! Briefing rendering.
//!
//! Pure formatting over a finished [`AccountRecord`]; no data decisions are
//! made here. Sections are filtered by the configured selection, and the
//! revenue section discloses data lineage from the recorded provenance.

use crate::core::config::Section;
use crate::core::models::{AccountRecord, RevenueSource};
use crate::core::risk::RiskAssessment;

/// Render one account's briefing as markdown.
#[must_use]
pub fn render_briefing(record: &AccountRecord, sections: &[Section]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Account briefing: {}\n", record.account.name));
    out.push_str(&format!(
        "_Generated {} UTC_\n",
        record.generated_at.format("%Y-%m-%d %H:%M")
    ));

    for section in sections {
        match section {
            Section::Revenue => render_revenue(record, &mut out),
            Section::Tickets => render_tickets(record, &mut out),
            Section::Billing => render_billing(record, &mut out),
            Section::Risks => render_risks(record, &mut out),
        }
    }
    out
}

/// Join per-account briefings into the run-level document.
#[must_use]
pub fn render_run(briefings: &[String]) -> String {
    briefings.join("\n---\n\n")
}

fn render_revenue(record: &AccountRecord, out: &mut String) {
    out.push_str("\n## Revenue\n");
    out.push_str(&format!("Source: {}\n", record.revenue.source.label()));
    match (&record.revenue.raw, record.revenue.source) {
        (Some(raw), _) => {
            out.push_str("```\n");
            out.push_str(raw.trim());
            out.push_str("\n```\n");
        }
        (None, RevenueSource::None) => out.push_str("No revenue data available.\n"),
        (None, _) => {}
    }
}

fn render_tickets(record: &AccountRecord, out: &mut String) {
    out.push_str("\n## Support tickets\n");
    if record.account.ticketing_org.is_none() {
        out.push_str("No ticketing organization configured for this account.\n");
        return;
    }
    out.push_str(&format!(
        "{} ticket(s) in the lookback window.\n",
        record.tickets.count()
    ));
    if record.tickets.truncated {
        out.push_str("Collection was truncated by a fetch failure; the count is a lower bound.\n");
    }
}

fn render_billing(record: &AccountRecord, out: &mut String) {
    let billing = &record.billing;
    out.push_str("\n## Billing\n");
    out.push_str(&format!("- Balance: {}\n", amount(billing.balance)));
    out.push_str(&format!("- Credit limit: {}\n", amount(billing.credit_limit)));
    out.push_str(&format!(
        "- Payment method: {}\n",
        billing.payment_method.as_deref().unwrap_or("unknown")
    ));
    out.push_str(&format!(
        "- Current month usage: {}\n",
        amount(billing.current_month_usage)
    ));
    out.push_str(&format!(
        "- Next month MRC: {}\n",
        amount(billing.next_month_mrc)
    ));
    out.push_str(&format!(
        "- Daily run rate: {}\n",
        amount(billing.daily_run_rate)
    ));
    out.push_str(&format!(
        "- Auto-recharge: {}\n",
        billing.auto_recharge.label()
    ));
    match billing.contract_end {
        Some(end) => out.push_str(&format!("- Contract end date: {end}\n")),
        None => out.push_str("- Contract end date: none on record\n"),
    }
}

fn render_risks(record: &AccountRecord, out: &mut String) {
    out.push_str("\n## Risks\n");
    match &record.risks {
        RiskAssessment::NoSignificantRisks => {
            out.push_str("No significant risks identified.\n");
        }
        RiskAssessment::Flagged { flags } => {
            for flag in flags {
                out.push_str(&format!("- {flag}\n"));
            }
        }
    }
}

fn amount(value: Option<f64>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| format!("${v:.2}"))
}
