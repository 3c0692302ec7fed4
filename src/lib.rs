//! abrief - Account Briefing
//!
//! A CLI tool that aggregates account data from unreliable external
//! providers (BI/reporting, ticketing, and an internal financial RPC agent)
//! into a structured, risk-annotated briefing per account.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod core;
pub mod error;
pub mod providers;
pub mod render;

pub use error::{AbriefError, ExitCode, Result};
