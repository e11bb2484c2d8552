//! Scan command implementation.
//!
//! Validates every input up front, then runs passive discovery, the active
//! scan and the merge, and finally emits the result set.

use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use crate::passive;
use crate::results::{self, HostMap, ScanMetadata, ScanResultSet};
use crate::scanner::{
    RateLimiter, ReachabilityMethod, ScanPlan, Scheduler, SystemProber, TimeWindowGate,
};
use crate::services::ServiceResolver;
use crate::types::{expand_targets, HostRange, PortSelection, ScanWindow};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Scan options.
#[derive(Args, Debug, Clone)]
pub struct ScanCommand {
    /// Targets to scan: addresses, CIDR blocks or ranges (comma-separated or repeated)
    ///
    /// Examples:
    ///   192.168.1.10          Single address
    ///   192.168.1.0/24        CIDR block
    ///   10.0.0.1-10.0.0.40    Address range
    ///   10.0.0.1-40           Address range, last-octet shorthand
    #[arg(value_name = "TARGETS", required = true, value_delimiter = ',')]
    pub targets: Vec<String>,

    /// Only scan hosts whose last octet is in this range (e.g. "1-50")
    #[arg(long = "hosts", value_name = "START-END")]
    pub host_range: Option<HostRange>,

    /// Ports to probe (e.g. "22,80,443", "8000-8100", "all", "none")
    #[arg(short, long, env = "NETVIS_PORTS")]
    pub ports: Option<String>,

    /// Probe every port from 1 to 65535
    #[arg(long, conflicts_with_all = ["ports", "no_ports"])]
    pub all_ports: bool,

    /// Only check reachability, probe no ports
    #[arg(long, conflicts_with = "ports")]
    pub no_ports: bool,

    /// Per-probe timeout in milliseconds
    #[arg(short = 't', long, env = "NETVIS_TIMEOUT_MS")]
    pub timeout: Option<u64>,

    /// Minimum delay between probes in seconds (0 disables pacing)
    #[arg(short = 'r', long = "rate", env = "NETVIS_RATE")]
    pub rate: Option<f64>,

    /// Daily window during which probing is allowed (HH:MM-HH:MM)
    #[arg(short = 'w', long, env = "NETVIS_WINDOW")]
    pub window: Option<String>,

    /// Maximum number of hosts scanned concurrently
    #[arg(short = 'j', long, env = "NETVIS_WORKERS")]
    pub workers: Option<usize>,

    /// Engagement label recorded in the results
    #[arg(short = 'e', long, env = "NETVIS_ENGAGEMENT")]
    pub engagement: Option<String>,

    /// How to decide whether a host is up
    #[arg(long, value_enum)]
    pub reachability: Option<ReachabilityMethod>,

    /// Reverse-resolve hostnames of reachable hosts
    #[arg(long)]
    pub resolve: bool,

    /// Skip reading the local neighbor table
    #[arg(long)]
    pub no_passive: bool,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Also write the JSON result document to this file
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Show a progress bar while scanning
    #[arg(long)]
    pub progress: bool,
}

/// A fully validated scan, ready to run.
#[derive(Debug, Clone)]
pub struct ResolvedScan {
    pub plan: ScanPlan,
    pub window: ScanWindow,
    pub limiter: RateLimiter,
    pub reachability: ReachabilityMethod,
    pub services: ServiceResolver,
    pub engagement: String,
    pub passive: bool,
}

impl ScanCommand {
    /// Combine flags with settings and validate everything. No network
    /// activity happens here.
    pub fn resolve(&self, settings: &AppSettings) -> CliResult<ResolvedScan> {
        let targets = expand_targets(&self.targets, self.host_range)?;

        let ports = if self.all_ports {
            PortSelection::Full
        } else if self.no_ports {
            PortSelection::None
        } else {
            self.ports.as_deref().unwrap_or(&settings.ports).parse()?
        };

        let window: ScanWindow = self
            .window
            .as_deref()
            .unwrap_or(&settings.scan_window)
            .parse()?;
        let limiter = RateLimiter::from_secs_f64(self.rate.unwrap_or(settings.rate_limit_seconds))?;
        let timeout = match self.timeout.unwrap_or(settings.timeout_ms) {
            0 => return Err(CliError::ZeroTimeout),
            ms => Duration::from_millis(ms),
        };

        let plan = ScanPlan::new(targets)
            .with_ports(ports)
            .with_workers(self.workers.unwrap_or(settings.workers))
            .with_timeout(timeout)
            .with_hostnames(self.resolve || settings.resolve_hostnames);

        Ok(ResolvedScan {
            plan,
            window,
            limiter,
            reachability: self.reachability.unwrap_or(settings.reachability),
            services: ServiceResolver::new().with_entries(settings.services.clone()),
            engagement: self
                .engagement
                .clone()
                .unwrap_or_else(|| settings.engagement.clone()),
            passive: settings.passive && !self.no_passive,
        })
    }

    /// Execute the scan and emit results.
    pub async fn execute(&self, settings: &AppSettings, quiet: bool) -> CliResult<ScanResultSet> {
        let run = self.resolve(settings)?;

        if run.window.is_inverted() {
            warn!(window = %run.window, "scan window start is after its end; it will never open");
            if !quiet {
                output::print_warning(&format!(
                    "scan window {} ends before it starts and never opens; no hosts will be probed",
                    run.window
                ));
            }
        }

        if !quiet && self.output == OutputFormat::Plain {
            output::print_info(&format!(
                "Scanning {} host(s), {} port(s) each, window {}, {:.2}s between probes",
                run.plan.targets.len(),
                run.plan.ports.len(),
                run.window,
                run.limiter.delay().as_secs_f64()
            ));
        }

        let mut metadata = ScanMetadata::new(
            run.limiter.delay(),
            run.window,
            !run.plan.ports.is_empty(),
        )
        .with_engagement(run.engagement.clone());

        let passive_hosts = if run.passive {
            passive::passive_hosts().await
        } else {
            HostMap::new()
        };
        info!(count = passive_hosts.len(), "passive discovery finished");

        let scheduler = Scheduler::new(
            Arc::new(SystemProber::new(run.reachability)),
            run.limiter.clone(),
            TimeWindowGate::new(run.window),
        )
        .with_services(run.services.clone())
        .with_progress(self.progress && !quiet);

        let outcome = scheduler.run(run.plan).await;
        metadata.completed = outcome.completed;

        let set = ScanResultSet {
            metadata,
            hosts: results::merge(passive_hosts, outcome.hosts),
        };

        output::print_results(&set, self.output)?;

        if let Some(path) = &self.output_file {
            output::write_json_file(&set, path)?;
            if !quiet {
                output::print_info(&format!("Results written to {}", path.display()));
            }
        }

        Ok(set)
    }
}
