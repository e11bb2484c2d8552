//! Passive host discovery from the local neighbor (ARP) table.
//!
//! Nothing here sends traffic to the hosts it reports. Failures are logged
//! and produce an empty map; passive discovery never fails a run.

use crate::results::{HostMap, HostRecord};
use anyhow::{bail, Context};
use std::net::IpAddr;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Kernel neighbor table on Linux.
#[cfg(target_os = "linux")]
const PROC_ARP: &str = "/proc/net/arp";

/// Collect hosts from the neighbor table.
pub async fn passive_hosts() -> HostMap {
    let addresses = match arp_table().await {
        Ok(output) => parse_arp_output(&output),
        Err(e) => {
            debug!(error = %format!("{:#}", e), "arp table unavailable");
            Vec::new()
        }
    };

    #[cfg(target_os = "linux")]
    let addresses = if addresses.is_empty() {
        proc_arp_table().await
    } else {
        addresses
    };

    debug!(count = addresses.len(), "passive hosts discovered");
    addresses
        .into_iter()
        .map(|addr| (addr, HostRecord::passive(addr)))
        .collect()
}

#[cfg(target_os = "linux")]
async fn proc_arp_table() -> Vec<IpAddr> {
    match tokio::fs::read_to_string(PROC_ARP).await {
        Ok(content) => parse_proc_arp(&content),
        Err(e) => {
            tracing::warn!(path = PROC_ARP, error = %e, "could not read neighbor table");
            Vec::new()
        }
    }
}

async fn arp_table() -> anyhow::Result<String> {
    let output = Command::new("arp")
        .arg("-a")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .context("failed to run `arp -a`")?;
    if !output.status.success() {
        bail!("`arp -a` exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extract addresses from `arp -a` output.
///
/// BSD and Linux net-tools print `host (10.0.0.1) at ...`; only the
/// parenthesized address is used. Unresolved entries are skipped, matching
/// the flags check in [`parse_proc_arp`].
pub fn parse_arp_output(output: &str) -> Vec<IpAddr> {
    let mut addresses: Vec<IpAddr> = output
        .lines()
        .filter(|line| !line.contains("<incomplete>") && !line.contains("(incomplete)"))
        .filter_map(|line| {
            let (_, rest) = line.split_once('(')?;
            let (inside, _) = rest.split_once(')')?;
            inside.trim().parse().ok()
        })
        .collect();
    addresses.sort_unstable();
    addresses.dedup();
    addresses
}

/// Extract complete entries from the `/proc/net/arp` table.
pub fn parse_proc_arp(content: &str) -> Vec<IpAddr> {
    let mut addresses: Vec<IpAddr> = content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [ip, _hw_type, flags, ..] if *flags != "0x0" => ip.parse().ok(),
                _ => None,
            }
        })
        .collect();
    addresses.sort_unstable();
    addresses.dedup();
    addresses
}
