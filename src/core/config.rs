//! Configuration loading and validation.
//!
//! Config comes from a TOML file; secrets come only from the environment,
//! never from disk. Validation runs before the first network call, and a
//! config missing any required top-level table is a fatal
//! [`AbriefError::ConfigInvalid`].

use std::path::Path;

use serde::Deserialize;

use crate::core::models::Account;
use crate::error::{AbriefError, Result};

/// Env var holding the BI personal access token secret.
pub const BI_SECRET_ENV: &str = "ABRIEF_BI_SECRET";

/// Env var holding the ticketing API token.
pub const TICKETING_TOKEN_ENV: &str = "ABRIEF_TICKETING_TOKEN";

/// Env var holding the notification bot token.
pub const NOTIFY_TOKEN_ENV: &str = "ABRIEF_NOTIFY_TOKEN";

/// Read a secret from the environment. Empty values count as absent.
#[must_use]
pub fn secret_from_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Config tables
// =============================================================================

/// BI provider connection settings (the token secret lives in the env).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BiProviderConfig {
    /// Base server URL, e.g. `https://bi.example.com`.
    pub server: String,
    /// Tenant site content URL. Empty string selects the default site.
    #[serde(default)]
    pub site: String,
    /// REST API version segment, e.g. `3.19`.
    pub api_version: String,
    /// Name of the personal access token to sign in with.
    pub token_name: String,
}

/// Ticketing provider connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TicketingConfig {
    /// Provider subdomain, e.g. `example` for `example.zendesk.com`.
    pub subdomain: String,
    /// Agent email used for token-based basic auth.
    pub email: String,
}

/// Financial RPC agent settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RpcAgentConfig {
    /// Full endpoint URL for the JSON-RPC envelope POST.
    pub url: String,
}

/// Briefing sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Revenue,
    Tickets,
    Billing,
    Risks,
}

impl Section {
    /// All sections in display order.
    pub const ALL: &'static [Self] = &[Self::Revenue, Self::Tickets, Self::Billing, Self::Risks];

    /// Parse from CLI argument.
    pub fn from_arg(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "revenue" => Ok(Self::Revenue),
            "tickets" => Ok(Self::Tickets),
            "billing" => Ok(Self::Billing),
            "risks" => Ok(Self::Risks),
            other => Err(AbriefError::ConfigInvalid {
                field: "sections".to_string(),
                message: format!("unknown section '{other}'"),
            }),
        }
    }
}

/// Briefing output format.
///
/// Markdown is the only format produced today; the field exists so configs
/// can pin it explicitly and so a second format is a config value away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
}

/// Run-level defaults, each overridable from the CLI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Defaults {
    /// How far back ticket collection looks, in days.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// Sections included in the briefing.
    #[serde(default = "default_sections")]
    pub sections: Vec<Section>,
    /// Output format of the briefing document.
    #[serde(default)]
    pub format: OutputFormat,
    /// Notification channel; absent disables the notification post.
    #[serde(default)]
    pub notify_channel: Option<String>,
    /// Proactive BI re-authentication cadence, in processed accounts.
    #[serde(default = "default_reauth_every")]
    pub reauth_every: usize,
}

fn default_lookback_days() -> i64 {
    90
}

fn default_sections() -> Vec<Section> {
    Section::ALL.to_vec()
}

fn default_reauth_every() -> usize {
    5
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            sections: default_sections(),
            format: OutputFormat::default(),
            notify_channel: None,
            reauth_every: default_reauth_every(),
        }
    }
}

// =============================================================================
// Top-level config
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    #[serde(default)]
    customers: Vec<Account>,
    billing_provider: Option<BiProviderConfig>,
    ticketing_provider: Option<TicketingConfig>,
    rpc_agent: Option<RpcAgentConfig>,
    #[serde(default)]
    defaults: Option<Defaults>,
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub customers: Vec<Account>,
    pub billing_provider: BiProviderConfig,
    pub ticketing_provider: TicketingConfig,
    /// Optional: when absent, RPC queries degrade to "no answer".
    pub rpc_agent: Option<RpcAgentConfig>,
    pub defaults: Defaults,
}

impl Config {
    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns a fatal configuration error if the file is missing,
    /// unparseable, or lacks a required top-level table.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|_| AbriefError::ConfigNotFound {
                path: path.display().to_string(),
            })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml_str(content: &str, path_label: &str) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| AbriefError::ConfigParse {
                path: path_label.to_string(),
                message: e.to_string(),
            })?;

        if raw.customers.is_empty() {
            return Err(AbriefError::ConfigInvalid {
                field: "customers".to_string(),
                message: "at least one customer is required".to_string(),
            });
        }
        let billing_provider = raw.billing_provider.ok_or_else(|| AbriefError::ConfigInvalid {
            field: "billing-provider".to_string(),
            message: "missing required table".to_string(),
        })?;
        let ticketing_provider =
            raw.ticketing_provider.ok_or_else(|| AbriefError::ConfigInvalid {
                field: "ticketing-provider".to_string(),
                message: "missing required table".to_string(),
            })?;

        let defaults = raw.defaults.unwrap_or_default();
        if defaults.reauth_every == 0 {
            return Err(AbriefError::ConfigInvalid {
                field: "defaults.reauth-every".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            customers: raw.customers,
            billing_provider,
            ticketing_provider,
            rpc_agent: raw.rpc_agent,
            defaults,
        })
    }

    /// Restrict the run to one account by name, case-insensitively.
    pub fn select_accounts(&self, filter: Option<&str>) -> Result<Vec<Account>> {
        match filter {
            None => Ok(self.customers.clone()),
            Some(name) => {
                let selected: Vec<Account> = self
                    .customers
                    .iter()
                    .filter(|a| a.name.eq_ignore_ascii_case(name))
                    .cloned()
                    .collect();
                if selected.is_empty() {
                    return Err(AbriefError::ConfigInvalid {
                        field: "account".to_string(),
                        message: format!("no configured customer named '{name}'"),
                    });
                }
                Ok(selected)
            }
        }
    }
}
