//! Core pipeline: config, transport, session, extraction, resolution,
//! aggregation, and risk derivation.

pub mod aggregate;
pub mod config;
pub mod extract;
pub mod http;
pub mod logging;
pub mod models;
pub mod revenue;
pub mod risk;
pub mod session;

pub use aggregate::Aggregator;
pub use config::{Config, OutputFormat, Section};
pub use extract::{BillingAnswers, Extraction, billing_facts, extract_bool, extract_date, extract_number};
pub use http::{RetryPolicy, Transport};
pub use models::{
    Account, AccountRecord, BillingFacts, RevenueResult, RevenueSource, Signal, TicketSet,
};
pub use revenue::resolve as resolve_revenue;
pub use risk::{RiskAssessment, RiskFlag};
pub use session::{BiCredentials, BiSession};
