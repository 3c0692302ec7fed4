//! Provider clients for the external data sources.
//!
//! Every outbound call goes through [`crate::core::http::Transport`]; none
//! of these clients runs its own retry loop, and none of their failures
//! aborts the account loop.

pub mod bi;
pub mod notify;
pub mod rpc_agent;
pub mod ticketing;
