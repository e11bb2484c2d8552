//! # netvis - Paced, Time-Windowed Network Visibility
//!
//! netvis discovers which hosts on authorized networks are up and which of a
//! small set of TCP ports accept connections. It is built for situations
//! where a scan must stay polite: probes are spaced by a global minimum
//! delay and only happen inside a daily scan window.
//!
//! ## Features
//!
//! - **Flexible Targeting**: single addresses, CIDR blocks and address ranges
//! - **Paced Probing**: one shared pacing limit across all workers
//! - **Scan Windows**: probing stops cooperatively once the window closes
//! - **Passive Discovery**: hosts already in the local neighbor table
//! - **Multiple Output Formats**: plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use netvis::scanner::{RateLimiter, ReachabilityMethod, ScanPlan, Scheduler, SystemProber, TimeWindowGate};
//! use netvis::types::{expand_targets, ScanWindow};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let targets = expand_targets(&["192.168.1.0/28"], None).unwrap();
//!     let plan = ScanPlan::new(targets).with_ports("22,80,443".parse().unwrap());
//!     let scheduler = Scheduler::new(
//!         Arc::new(SystemProber::new(ReachabilityMethod::Ping)),
//!         RateLimiter::new(Duration::from_millis(200)),
//!         TimeWindowGate::new(ScanWindow::always()),
//!     );
//!
//!     let outcome = scheduler.run(plan).await;
//!     for (address, host) in &outcome.hosts {
//!         println!("{address} active={}", host.active);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports, targets and scan windows
//! - [`scanner`] - Probing, pacing, window gating and the worker scheduler
//! - [`passive`] - Neighbor-table discovery
//! - [`results`] - Host records, metadata and merging
//! - [`services`] - Port to service-name table
//! - [`config`] - Settings file
//! - [`output`] - Output formatting utilities
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod passive;
pub mod results;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError};
pub use results::{HostRecord, ScanMetadata, ScanResultSet};
pub use scanner::{RateLimiter, ScanPlan, Scheduler, TimeWindowGate};
pub use types::{Port, PortSelection, ScanWindow, TargetSpec};
