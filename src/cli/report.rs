//! Briefing run execution.
//!
//! Loads and validates config before any network call, runs the aggregator
//! across the selected accounts, renders the document, and hands it to the
//! output file and notification sink. Per-account data gaps surface as
//! warnings; only configuration failures escape as errors.

use crate::cli::args::Cli;
use crate::core::aggregate::{self, Aggregator};
use crate::core::config::{Config, OutputFormat};
use crate::core::http::Transport;
use crate::core::revenue;
use crate::core::session::{BiCredentials, BiSession};
use crate::error::Result;
use crate::providers::notify::Notifier;
use crate::providers::rpc_agent::RpcAgentClient;
use crate::providers::ticketing::TicketingClient;
use crate::render;

/// Execute the briefing run.
pub async fn execute(cli: &Cli) -> Result<()> {
    cli.validate()?;
    let config = Config::load(&cli.config)?;
    let accounts = config.select_accounts(cli.account.as_deref())?;
    let sections = cli.selected_sections(&config.defaults.sections)?;
    let lookback_days = cli.lookback_days.unwrap_or(config.defaults.lookback_days);

    if cli.dry_run {
        print_dry_run(&accounts, &config, lookback_days);
        return Ok(());
    }

    let transport = Transport::with_defaults()?;
    let session = BiSession::new(
        BiCredentials::from_config(&config.billing_provider),
        transport.clone(),
    );
    let ticketing = TicketingClient::from_config(&config.ticketing_provider, transport.clone());
    let rpc = RpcAgentClient::new(
        config.rpc_agent.as_ref().map(|r| r.url.clone()),
        transport.clone(),
    );

    let mut aggregator = Aggregator::new(
        session,
        ticketing,
        rpc,
        lookback_days,
        config.defaults.reauth_every,
    );
    let records = aggregator.run(&accounts).await;

    let briefings: Vec<String> = records
        .iter()
        .map(|record| render::render_briefing(record, &sections))
        .collect();
    let document = match config.defaults.format {
        OutputFormat::Markdown => render::render_run(&briefings),
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &document)?;
            tracing::info!(path = %path.display(), "briefing written");
        }
        None => println!("{document}"),
    }

    if let Some(channel) = &config.defaults.notify_channel {
        let notifier = Notifier::from_env(transport);
        if let Err(e) = notifier.post(channel, &document).await {
            tracing::warn!(error = %e, "notification post failed, continuing");
        }
    }

    Ok(())
}

/// Describe every call the run would make, without making any.
fn print_dry_run(accounts: &[crate::core::models::Account], config: &Config, lookback_days: i64) {
    println!("Dry run: no network calls will be made.\n");
    println!(
        "BI provider: {} (site '{}', API {})",
        config.billing_provider.server, config.billing_provider.site, config.billing_provider.api_version
    );
    println!(
        "Ticketing provider: {}.zendesk.com, lookback {} day(s)",
        config.ticketing_provider.subdomain, lookback_days
    );
    match &config.rpc_agent {
        Some(agent) => println!("RPC agent: {}", agent.url),
        None => println!("RPC agent: not configured"),
    }

    for account in accounts {
        println!("\nAccount: {} ({})", account.name, account.billing_id);
        println!("  revenue view filter: name:eq:{}", account.bi_name());
        println!(
            "  fallback revenue question: {}",
            revenue::fallback_question(account)
        );
        match &account.ticketing_org {
            Some(org) => println!("  ticket query: type:ticket organization:{org}"),
            None => println!("  ticket query: skipped (no ticketing org)"),
        }
        for question in aggregate::billing_questions(account) {
            println!("  billing question: {question}");
        }
    }
}
