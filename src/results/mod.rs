//! Scan result data model.
//!
//! A run produces one [`ScanResultSet`]: per-address [`HostRecord`]s plus a
//! metadata block describing how the scan was constrained.

mod aggregate;

pub use aggregate::merge;

use crate::types::{Port, ScanWindow};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Address-keyed host records, ordered numerically.
pub type HostMap = BTreeMap<IpAddr, HostRecord>;

/// Where a host record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Probed directly by the scanner.
    Active,
    /// Seen in the local neighbor table without sending traffic.
    Passive,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Passive => write!(f, "passive"),
        }
    }
}

/// Result of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortProbeResult {
    pub port: Port,
    /// Only open results are kept on a host, so this is not emitted.
    #[serde(skip)]
    pub open: bool,
    pub service: String,
}

impl PortProbeResult {
    pub fn new(port: Port, open: bool, service: impl Into<String>) -> Self {
        Self {
            port,
            open,
            service: service.into(),
        }
    }
}

/// Everything known about one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    #[serde(skip)]
    pub address: IpAddr,
    pub active: bool,
    pub source: Source,
    pub hostname: Option<String>,
    pub ports: Vec<PortProbeResult>,
}

impl HostRecord {
    /// A host that answered the reachability probe.
    pub fn reachable(address: IpAddr) -> Self {
        Self {
            address,
            active: true,
            source: Source::Active,
            hostname: None,
            ports: Vec::new(),
        }
    }

    /// A probed host that did not answer.
    pub fn unreachable(address: IpAddr) -> Self {
        Self {
            active: false,
            ..Self::reachable(address)
        }
    }

    /// A host observed only in the neighbor table.
    pub fn passive(address: IpAddr) -> Self {
        Self {
            address,
            active: false,
            source: Source::Passive,
            hostname: None,
            ports: Vec::new(),
        }
    }

    pub fn with_hostname(mut self, hostname: Option<String>) -> Self {
        self.hostname = hostname;
        self
    }

    pub fn has_open_ports(&self) -> bool {
        !self.ports.is_empty()
    }
}

/// How the run was configured and whether it ran to completion.
#[derive(Debug, Clone, Serialize)]
pub struct ScanMetadata {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "rate_limit_seconds", serialize_with = "serialize_secs")]
    pub rate_limit: Duration,
    pub scan_window: ScanWindow,
    pub ports_scanned: bool,
    pub engagement: String,
    /// False when the scan window closed before every host was scanned.
    pub completed: bool,
}

impl ScanMetadata {
    /// Metadata stamped with the current time.
    pub fn new(rate_limit: Duration, scan_window: ScanWindow, ports_scanned: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            rate_limit,
            scan_window,
            ports_scanned,
            engagement: "UNSPECIFIED".to_string(),
            completed: true,
        }
    }

    pub fn with_engagement(mut self, engagement: impl Into<String>) -> Self {
        self.engagement = engagement.into();
        self
    }
}

/// Final output of a run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResultSet {
    pub metadata: ScanMetadata,
    pub hosts: HostMap,
}

impl ScanResultSet {
    pub fn new(metadata: ScanMetadata) -> Self {
        Self {
            metadata,
            hosts: HostMap::new(),
        }
    }

    /// Hosts marked active, in address order.
    pub fn active_hosts(&self) -> impl Iterator<Item = &HostRecord> {
        self.hosts.values().filter(|host| host.active)
    }

    /// Active hosts with at least one open port.
    pub fn hosts_with_open_ports(&self) -> impl Iterator<Item = &HostRecord> {
        self.active_hosts().filter(|host| host.has_open_ports())
    }
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn serialize_secs<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(delay.as_secs_f64())
}
