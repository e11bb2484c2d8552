//! Command-line interface for netvis.
//!
//! `netvis [OPTIONS] <TARGETS>...` scans one or more ranges. Every scan
//! option falls back to the settings file when not given on the command
//! line or through its `NETVIS_*` environment variable.

mod scan;

pub use scan::{ResolvedScan, ScanCommand};

use crate::config::AppSettings;
use crate::error::CliResult;
use crate::results::ScanResultSet;
use clap::Parser;
use std::path::PathBuf;

/// netvis - paced, time-windowed network visibility scanning.
///
/// Discovers live hosts on the given ranges and reports which of the
/// selected TCP ports accept connections. Probing only happens inside the
/// configured daily scan window and never faster than the configured pace.
#[derive(Parser, Debug)]
#[command(name = "netvis")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Authorized network visibility scanner (discovery only)", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub scan: ScanCommand,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file (defaults to the XDG config directory)
    #[arg(long, value_name = "PATH", env = "NETVIS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load settings and run the scan.
    pub async fn execute(&self) -> CliResult<ScanResultSet> {
        let settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };
        self.scan.execute(&settings, self.quiet).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["netvis", "-v", "10.0.0.1"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(Cli::try_parse_from(["netvis", "-v", "-q", "10.0.0.1"]).is_err());
    }

    #[test]
    fn test_targets_required() {
        assert!(Cli::try_parse_from(["netvis"]).is_err());
    }
}
