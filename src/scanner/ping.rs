//! ICMP echo through the platform ping utility.
//!
//! Raw ICMP sockets need privileges on most systems; the ping binary does
//! not. Argument syntax differs per OS and is chosen at compile time.

use std::net::IpAddr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Extra time granted to the ping process beyond its own deadline.
const PROCESS_GRACE: Duration = Duration::from_millis(500);

/// Build the ping invocation for one echo request.
pub fn ping_command(addr: IpAddr, limit: Duration) -> Command {
    let mut cmd = Command::new(program(addr));
    cmd.args(arguments(addr, limit))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    cmd
}

/// Send a single echo request; any failure means unreachable.
pub async fn ping(addr: IpAddr, limit: Duration) -> bool {
    let output = match timeout(limit + PROCESS_GRACE, ping_command(addr, limit).output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            debug!(%addr, error = %e, "could not run ping");
            return false;
        }
        Err(_) => {
            debug!(%addr, "ping process exceeded its deadline");
            return false;
        }
    };
    reply_received(output.status.success(), &String::from_utf8_lossy(&output.stdout))
}

#[cfg(target_os = "windows")]
fn reply_received(success: bool, stdout: &str) -> bool {
    // Windows exits 0 for "Destination host unreachable" relayed by a gateway.
    success && (stdout.contains("TTL=") || stdout.contains("time="))
}

#[cfg(not(target_os = "windows"))]
fn reply_received(success: bool, _stdout: &str) -> bool {
    success
}

#[cfg(any(target_os = "macos", target_os = "freebsd", target_os = "openbsd"))]
fn program(addr: IpAddr) -> &'static str {
    if addr.is_ipv6() {
        "ping6"
    } else {
        "ping"
    }
}

#[cfg(not(any(target_os = "macos", target_os = "freebsd", target_os = "openbsd")))]
fn program(_addr: IpAddr) -> &'static str {
    "ping"
}

#[cfg(target_os = "windows")]
fn arguments(addr: IpAddr, limit: Duration) -> Vec<String> {
    let mut args = vec!["-n".into(), "1".into(), "-w".into(), millis(limit).to_string()];
    if addr.is_ipv6() {
        args.push("-6".into());
    }
    args.push(addr.to_string());
    args
}

#[cfg(any(target_os = "macos", target_os = "freebsd", target_os = "openbsd"))]
fn arguments(addr: IpAddr, limit: Duration) -> Vec<String> {
    let mut args = vec!["-c".into(), "1".into()];
    if addr.is_ipv4() {
        // BSD ping takes the reply wait in milliseconds.
        args.extend(["-W".into(), millis(limit).to_string()]);
    }
    args.push(addr.to_string());
    args
}

#[cfg(not(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "openbsd"
)))]
fn arguments(addr: IpAddr, limit: Duration) -> Vec<String> {
    let mut args = vec![
        "-n".into(),
        "-c".into(),
        "1".into(),
        "-W".into(),
        whole_secs(limit).to_string(),
    ];
    if addr.is_ipv6() {
        args.push("-6".into());
    }
    args.push(addr.to_string());
    args
}

#[allow(dead_code)]
fn millis(limit: Duration) -> u128 {
    limit.as_millis().max(1)
}

/// iputils only accepts whole seconds; round up so short timeouts still wait.
#[allow(dead_code)]
fn whole_secs(limit: Duration) -> u64 {
    let secs = limit.as_secs();
    if limit.subsec_nanos() > 0 || secs == 0 {
        secs + 1
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    const V4: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
    const V6: IpAddr = IpAddr::V6(Ipv6Addr::LOCALHOST);

    #[test]
    fn test_whole_secs_rounds_up() {
        assert_eq!(whole_secs(Duration::from_millis(200)), 1);
        assert_eq!(whole_secs(Duration::from_secs(1)), 1);
        assert_eq!(whole_secs(Duration::from_millis(1500)), 2);
        assert_eq!(whole_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_single_echo_request() {
        let args = arguments(V4, Duration::from_secs(1));
        assert_eq!(args.last().map(String::as_str), Some("192.0.2.1"));
        assert!(args.iter().any(|a| a == "1"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_arguments() {
        assert_eq!(
            arguments(V4, Duration::from_millis(1500)),
            vec!["-n", "-c", "1", "-W", "2", "192.0.2.1"]
        );
        assert_eq!(
            arguments(V6, Duration::from_secs(1)),
            vec!["-n", "-c", "1", "-W", "1", "-6", "::1"]
        );
        assert_eq!(program(V6), "ping");
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_exit_status_decides() {
        assert!(reply_received(true, ""));
        assert!(!reply_received(false, "64 bytes from 192.0.2.1"));
    }
}
