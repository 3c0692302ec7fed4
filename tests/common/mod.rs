//! Common test utilities and fixtures for integration tests.
//!
//! - `fixtures`: factories for accounts, transports, and provider payloads
//! - `logger`: structured per-test logging, controlled by `TEST_LOG_LEVEL`

pub mod fixtures;
pub mod logger;
