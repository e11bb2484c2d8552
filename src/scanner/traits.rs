//! Probe capability abstraction.
//!
//! The scheduler only talks to a [`HostProber`], so the reachability
//! mechanism (ICMP via the system ping utility, TCP, or a test double) is
//! chosen once at startup and never leaks into scheduling logic.

use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// How host reachability is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReachabilityMethod {
    /// ICMP echo through the platform ping utility.
    #[default]
    Ping,
    /// TCP connect to a few common ports; an accept or a refusal means the host is up.
    Tcp,
}

impl fmt::Display for ReachabilityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ping => write!(f, "ping"),
            Self::Tcp => write!(f, "tcp"),
        }
    }
}

/// Single-shot network probes.
///
/// Implementations never retry and never report errors: every failure is
/// folded into a negative answer.
#[async_trait]
pub trait HostProber: Send + Sync {
    /// Whether the host answers a reachability check within `timeout`.
    async fn probe_reachability(&self, addr: IpAddr, timeout: Duration) -> bool;

    /// Whether a TCP connection to `port` succeeds within `timeout`.
    async fn probe_port(&self, addr: IpAddr, port: Port, timeout: Duration) -> bool;

    /// Best-effort reverse name lookup.
    async fn resolve_hostname(&self, addr: IpAddr) -> Option<String>;
}

/// A shared prober for dynamic dispatch across workers.
pub type SharedProber = Arc<dyn HostProber>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(ReachabilityMethod::Ping.to_string(), "ping");
        assert_eq!(ReachabilityMethod::Tcp.to_string(), "tcp");
        assert_eq!(ReachabilityMethod::default(), ReachabilityMethod::Ping);
    }

    #[test]
    fn test_method_deserializes_lowercase() {
        let method: ReachabilityMethod = serde_json::from_str("\"tcp\"").unwrap();
        assert_eq!(method, ReachabilityMethod::Tcp);
    }
}
