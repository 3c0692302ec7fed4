//! End-to-end pipeline tests: aggregation through rendering against mock
//! providers.
//!
//! Exercises the revenue source fallback with provenance, the all-providers
//! healthy path, and risk flag derivation from extracted billing facts.

mod common;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use abrief::core::aggregate::Aggregator;
use abrief::core::config::Section;
use abrief::core::models::RevenueSource;
use abrief::core::risk::{RiskAssessment, RiskFlag};
use abrief::core::session::BiSession;
use abrief::providers::rpc_agent::RpcAgentClient;
use abrief::providers::ticketing::TicketingClient;
use abrief::render;

use common::fixtures;
use common::logger::TestLogger;

/// An answer text carrying every billing fact the extractor looks for.
const BILLING_ANSWER: &str = "The account balance is $9,500.00 against a credit limit of \
     $10,000. Payment method on file: invoice. Current month usage is \
     $4,200 with next month MRC at $3,000 and a daily run rate of $140. \
     Auto-recharge is disabled; the contract ends 2026-06-30.";

fn ticketing(mock_server: &MockServer, token: Option<&str>) -> TicketingClient {
    TicketingClient::new(
        mock_server.uri(),
        "bot@example.com".to_string(),
        token.map(str::to_string),
        fixtures::fast_transport(),
    )
}

#[tokio::test]
async fn healthy_providers_produce_a_fully_populated_record() {
    let log = TestLogger::new("healthy_providers_produce_a_fully_populated_record");
    log.phase("setup");

    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/3.19/auth/signin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::signin_body("tok-1", "site-1")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3.19/sites/site-1/views"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::views_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search/export.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::search_page(0, 12, None)))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::rpc_answer(BILLING_ANSWER)))
        .mount(&mock_server)
        .await;

    log.phase("execute");
    let session = fixtures::bi_session(&mock_server.uri(), fixtures::fast_transport());
    let rpc = RpcAgentClient::new(
        Some(format!("{}/rpc", mock_server.uri())),
        fixtures::fast_transport(),
    );
    let mut aggregator = Aggregator::new(session, ticketing(&mock_server, Some("tkn")), rpc, 90, 5);
    let records = aggregator.run(&[fixtures::account()]).await;

    log.phase("verify");
    assert_eq!(records.len(), 1);
    let record = &records[0];

    // Revenue came from the primary source.
    assert_eq!(record.revenue.source, RevenueSource::Primary);
    assert!(record.revenue.raw.as_deref().is_some_and(|r| r.contains("Acme Revenue")));

    assert_eq!(record.tickets.count(), 12);
    assert!(!record.tickets.truncated);

    // Billing facts extracted from the agent's free text.
    assert_eq!(record.billing.balance, Some(9500.0));
    assert_eq!(record.billing.credit_limit, Some(10_000.0));
    assert_eq!(record.billing.payment_method.as_deref(), Some("invoice"));
    assert_eq!(record.billing.current_month_usage, Some(4200.0));
    assert_eq!(record.billing.next_month_mrc, Some(3000.0));
    assert_eq!(record.billing.daily_run_rate, Some(140.0));

    // 95% utilization, auto-recharge off, contract date on record, and 12
    // tickets: all four flags, in display order.
    let flags = record.risks.flags();
    assert_eq!(flags.len(), 4);
    assert!(matches!(flags[0], RiskFlag::HighCreditUtilization { .. }));
    assert!(matches!(flags[1], RiskFlag::AutoRechargeDisabled));
    assert!(matches!(flags[2], RiskFlag::ContractRenewal { .. }));
    assert!(matches!(flags[3], RiskFlag::HighTicketVolume { count: 12 }));
    log.finish_ok();
}

#[tokio::test]
async fn unavailable_primary_falls_back_with_provenance() {
    let log = TestLogger::new("unavailable_primary_falls_back_with_provenance");
    log.phase("setup");

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::rpc_answer("Monthly totals: Jan $20,000, Feb $21,500.")),
        )
        .mount(&mock_server)
        .await;

    log.phase("execute");
    // No BI secret: the primary source is skipped without network traffic.
    let session = BiSession::new(
        fixtures::bi_credentials(&mock_server.uri(), None),
        fixtures::fast_transport(),
    );
    let rpc = RpcAgentClient::new(
        Some(format!("{}/rpc", mock_server.uri())),
        fixtures::fast_transport(),
    );
    let mut aggregator = Aggregator::new(session, ticketing(&mock_server, None), rpc, 90, 5);
    let records = aggregator.run(&[fixtures::account()]).await;

    log.phase("verify");
    let record = &records[0];
    assert_eq!(record.revenue.source, RevenueSource::Fallback);
    assert!(record.revenue.raw.as_deref().is_some_and(|r| r.contains("Jan $20,000")));

    // The briefing discloses the fallback lineage.
    let text = render::render_briefing(record, Section::ALL);
    assert!(text.contains("Source: financial agent"));
    log.finish_ok();
}

#[tokio::test]
async fn failing_primary_falls_back_at_runtime() {
    let log = TestLogger::new("failing_primary_falls_back_at_runtime");
    log.phase("setup");

    let mock_server = MockServer::start().await;
    // Sign-in works, but the revenue view read returns an empty view list.
    Mock::given(method("POST"))
        .and(path("/api/3.19/auth/signin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::signin_body("tok-1", "site-1")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3.19/sites/site-1/views"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "views": { "view": [] } })),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::rpc_answer("Revenue: $5,000/mo.")))
        .mount(&mock_server)
        .await;

    log.phase("execute");
    let session = fixtures::bi_session(&mock_server.uri(), fixtures::fast_transport());
    let rpc = RpcAgentClient::new(
        Some(format!("{}/rpc", mock_server.uri())),
        fixtures::fast_transport(),
    );
    let mut aggregator = Aggregator::new(session, ticketing(&mock_server, None), rpc, 90, 5);
    let records = aggregator.run(&[fixtures::account()]).await;

    log.phase("verify");
    assert_eq!(records[0].revenue.source, RevenueSource::Fallback);
    log.finish_ok();
}

#[tokio::test]
async fn every_provider_down_still_renders_a_briefing() {
    let log = TestLogger::new("every_provider_down_still_renders_a_briefing");
    log.phase("setup");

    let transport = fixtures::fast_transport();
    let session = BiSession::new(
        fixtures::bi_credentials("https://bi.invalid", None),
        transport.clone(),
    );
    let ticketing = TicketingClient::new(
        "https://example.invalid".to_string(),
        "bot@example.com".to_string(),
        None,
        transport.clone(),
    );
    let rpc = RpcAgentClient::new(None, transport);

    log.phase("execute");
    let mut aggregator = Aggregator::new(session, ticketing, rpc, 90, 5);
    let records = aggregator.run(&[fixtures::account()]).await;

    log.phase("verify");
    let record = &records[0];
    assert_eq!(record.revenue.source, RevenueSource::None);
    assert_eq!(record.risks, RiskAssessment::NoSignificantRisks);

    let text = render::render_briefing(record, Section::ALL);
    assert!(text.contains("# Account briefing: Acme"));
    assert!(text.contains("No revenue data available."));
    assert!(text.contains("- Balance: unknown"));
    assert!(text.contains("No significant risks identified."));
    log.finish_ok();
}

#[tokio::test]
async fn cadence_reauth_fires_between_accounts() {
    let log = TestLogger::new("cadence_reauth_fires_between_accounts");
    log.phase("setup");

    let mock_server = MockServer::start().await;
    // Three accounts with reauth-every = 2: one sign-in for the first
    // account's revenue read, one cadence refresh before the third.
    Mock::given(method("POST"))
        .and(path("/api/3.19/auth/signin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::signin_body("tok-1", "site-1")),
        )
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3.19/sites/site-1/views"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::views_body()))
        .expect(3)
        .mount(&mock_server)
        .await;

    log.phase("execute");
    let session = fixtures::bi_session(&mock_server.uri(), fixtures::fast_transport());
    let rpc = RpcAgentClient::new(None, fixtures::fast_transport());
    let mut aggregator = Aggregator::new(session, ticketing(&mock_server, None), rpc, 90, 2);

    let mut accounts = Vec::new();
    for name in ["Acme", "Globex", "Initech"] {
        let mut account = fixtures::account();
        account.name = name.to_string();
        account.ticketing_org = None;
        accounts.push(account);
    }
    let records = aggregator.run(&accounts).await;

    log.phase("verify");
    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.revenue.source, RevenueSource::Primary);
    }
    log.finish_ok();
}
