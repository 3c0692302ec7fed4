//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::core::config::Section;
use crate::error::{AbriefError, Result};

/// Account briefing generator - aggregates revenue, support, and billing
/// data into risk-annotated briefings.
#[derive(Parser, Debug)]
#[command(name = "abrief")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, value_name = "PATH", default_value = "abrief.toml")]
    pub config: PathBuf,

    /// Restrict the run to one configured account (by name)
    #[arg(long, value_name = "NAME")]
    pub account: Option<String>,

    /// Override the configured ticket lookback window, in days
    #[arg(long, value_name = "DAYS")]
    pub lookback_days: Option<i64>,

    /// Write the briefing document to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print what would be queried without making any network calls
    #[arg(long)]
    pub dry_run: bool,

    /// Briefing section to include (repeatable; defaults to the config)
    #[arg(long = "section", value_name = "SECTION")]
    pub sections: Vec<String>,

    /// Log level
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Validate argument combinations.
    pub fn validate(&self) -> Result<()> {
        if let Some(days) = self.lookback_days {
            if days <= 0 {
                return Err(AbriefError::ConfigInvalid {
                    field: "lookback-days".to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolve the section selection, falling back to the config defaults.
    pub fn selected_sections(&self, defaults: &[Section]) -> Result<Vec<Section>> {
        if self.sections.is_empty() {
            return Ok(defaults.to_vec());
        }
        self.sections.iter().map(|s| Section::from_arg(s)).collect()
    }
}
