//! TCP connect probing.
//!
//! Uses the operating system's socket API to complete a full handshake and
//! immediately drops the connection. No special privileges are required.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Ports tried by TCP-based reachability checks.
pub const REACHABILITY_PORTS: [u16; 4] = [80, 443, 22, 445];

/// Outcome of a single connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Handshake completed.
    Accepted,
    /// The host answered with a reset.
    Refused,
    /// No answer within the timeout.
    TimedOut,
    /// Any other failure (unreachable, reset mid-handshake, local error).
    Failed,
}

/// Attempt one connection to `addr:port`.
pub async fn connect(addr: IpAddr, port: u16, limit: Duration) -> ConnectOutcome {
    let target = SocketAddr::new(addr, port);
    match timeout(limit, TcpStream::connect(target)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            ConnectOutcome::Accepted
        }
        Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => ConnectOutcome::Refused,
        Ok(Err(e)) => {
            trace!(%target, error = %e, "connect failed");
            ConnectOutcome::Failed
        }
        Err(_) => ConnectOutcome::TimedOut,
    }
}

/// Whether the port accepted a connection. Everything else counts as closed.
pub async fn is_port_open(addr: IpAddr, port: u16, limit: Duration) -> bool {
    connect(addr, port, limit).await == ConnectOutcome::Accepted
}

/// Whether the host answers on any of [`REACHABILITY_PORTS`].
///
/// A refusal proves the host is up just as well as an accept. The attempts
/// run concurrently and share one overall timeout.
pub async fn is_host_up(addr: IpAddr, limit: Duration) -> bool {
    let attempts = REACHABILITY_PORTS.iter().map(|&port| {
        Box::pin(async move {
            match connect(addr, port, limit).await {
                ConnectOutcome::Accepted | ConnectOutcome::Refused => Ok(()),
                other => Err(other),
            }
        })
    });
    futures::future::select_ok(attempts).await.is_ok()
}
