//! Scanner module - schedules per-host scan jobs.
//!
//! Each target becomes one job that runs end to end on a tokio task:
//! reachability first, then the selected ports in order. At most `workers`
//! jobs run at once. All jobs share one [`RateLimiter`] and one
//! [`TimeWindowGate`]; once the gate is found closed no further probe work
//! is issued and the results gathered so far are returned.

pub mod gate;
pub mod ping;
pub mod prober;
pub mod rate_limiter;
pub mod tcp;
pub mod traits;

pub use gate::{Clock, FixedClock, SystemClock, TimeWindowGate};
pub use prober::SystemProber;
pub use rate_limiter::{PacingError, RateLimiter};
pub use traits::{HostProber, ReachabilityMethod, SharedProber, DEFAULT_PROBE_TIMEOUT};

use crate::results::{HostMap, HostRecord, PortProbeResult};
use crate::services::ServiceResolver;
use crate::types::PortSelection;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Default number of concurrent host jobs.
pub const DEFAULT_WORKERS: usize = 32;

/// What to scan and how hard.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    /// Expanded, deduplicated target addresses.
    pub targets: Vec<IpAddr>,
    /// Ports to probe on reachable hosts.
    pub ports: PortSelection,
    /// Maximum number of concurrent host jobs.
    pub workers: usize,
    /// Timeout applied to every individual probe.
    pub probe_timeout: Duration,
    /// Whether to reverse-resolve reachable hosts.
    pub resolve_hostnames: bool,
}

impl ScanPlan {
    /// A reachability-only plan with default settings.
    pub fn new(targets: Vec<IpAddr>) -> Self {
        Self {
            targets,
            ports: PortSelection::None,
            workers: DEFAULT_WORKERS,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            resolve_hostnames: false,
        }
    }

    pub fn with_ports(mut self, ports: PortSelection) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_hostnames(mut self, resolve: bool) -> Self {
        self.resolve_hostnames = resolve;
        self
    }
}

/// Records gathered by a run.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// One record per host whose job ran.
    pub hosts: HostMap,
    /// False when the scan window closed before every job ran.
    pub completed: bool,
}

/// Runs scan plans against a prober under shared pacing and window limits.
pub struct Scheduler {
    prober: SharedProber,
    limiter: RateLimiter,
    gate: TimeWindowGate,
    services: Arc<ServiceResolver>,
    progress: bool,
}

impl Scheduler {
    pub fn new(prober: SharedProber, limiter: RateLimiter, gate: TimeWindowGate) -> Self {
        Self {
            prober,
            limiter,
            gate,
            services: Arc::new(ServiceResolver::new()),
            progress: false,
        }
    }

    pub fn with_services(mut self, services: ServiceResolver) -> Self {
        self.services = Arc::new(services);
        self
    }

    /// Show a progress bar counting finished host jobs.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Execute the plan. Never fails: unreachable hosts are recorded as
    /// inactive and a closed window ends the run early.
    pub async fn run(&self, plan: ScanPlan) -> ScanOutcome {
        let start_time = Instant::now();
        let total = plan.targets.len();
        let workers = plan.workers.max(1);

        info!(
            hosts = total,
            ports = plan.ports.len(),
            workers,
            delay_ms = self.limiter.delay().as_millis() as u64,
            window = %self.gate.window(),
            "starting scan"
        );

        let progress = self.progress.then(|| progress_bar(total as u64));

        let job = Arc::new(HostJob {
            prober: Arc::clone(&self.prober),
            limiter: self.limiter.clone(),
            gate: self.gate.clone(),
            services: Arc::clone(&self.services),
            ports: plan.ports,
            timeout: plan.probe_timeout,
            resolve_hostnames: plan.resolve_hostnames,
            halted: AtomicBool::new(false),
            results: Mutex::new(HostMap::new()),
        });

        stream::iter(plan.targets)
            .map(|addr| {
                let job = Arc::clone(&job);
                tokio::spawn(async move { job.scan_host(addr).await })
            })
            .buffer_unordered(workers)
            .for_each(|joined| {
                match joined {
                    Ok(Some(record)) if record.active => {
                        if let Some(pb) = &progress {
                            pb.set_message(format!("{} is up", record.address));
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "scan job aborted"),
                }
                if let Some(pb) = &progress {
                    pb.inc(1);
                }
                futures::future::ready(())
            })
            .await;

        let hosts = std::mem::take(&mut *job.results.lock().await);
        let completed = !job.is_halted();

        if let Some(pb) = progress {
            pb.finish_with_message(if completed {
                "scan complete"
            } else {
                "scan window closed"
            });
        }

        info!(
            scanned = hosts.len(),
            abandoned = total - hosts.len(),
            completed,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "scan finished"
        );

        ScanOutcome { hosts, completed }
    }
}

/// State shared by every job in one run.
struct HostJob {
    prober: SharedProber,
    limiter: RateLimiter,
    gate: TimeWindowGate,
    services: Arc<ServiceResolver>,
    ports: PortSelection,
    timeout: Duration,
    resolve_hostnames: bool,
    halted: AtomicBool,
    results: Mutex<HostMap>,
}

impl HostJob {
    fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Check the gate, latching the halt flag the first time it is closed.
    fn may_proceed(&self) -> bool {
        if self.is_halted() {
            return false;
        }
        if self.gate.is_open() {
            return true;
        }
        if !self.halted.swap(true, Ordering::AcqRel) {
            info!(window = %self.gate.window(), "scan window closed, no further probes will be issued");
        }
        false
    }

    /// Scan one host. Returns a copy of the stored record, or `None` when
    /// the job was abandoned before it started.
    async fn scan_host(&self, addr: IpAddr) -> Option<HostRecord> {
        if !self.may_proceed() {
            debug!(%addr, "host skipped, scan halted");
            return None;
        }

        self.limiter.throttle().await;
        if !self.prober.probe_reachability(addr, self.timeout).await {
            return Some(self.store(HostRecord::unreachable(addr)).await);
        }

        let mut record = HostRecord::reachable(addr);
        if self.resolve_hostnames {
            record.hostname = self.prober.resolve_hostname(addr).await;
        }

        // A full sweep can outlast the window, so it re-checks between ports.
        let check_each_port = self.ports.is_full_sweep();
        for port in self.ports.ports() {
            if check_each_port && !self.may_proceed() {
                debug!(%addr, %port, "sweep interrupted by scan window");
                break;
            }
            self.limiter.throttle().await;
            if self.prober.probe_port(addr, port, self.timeout).await {
                let service = self.services.resolve(port.as_u16());
                record.ports.push(PortProbeResult::new(port, true, service));
            }
        }

        Some(self.store(record).await)
    }

    async fn store(&self, record: HostRecord) -> HostRecord {
        let mut results = self.results.lock().await;
        results.insert(record.address, record.clone());
        record
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} hosts ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}
