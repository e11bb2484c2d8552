//! The production [`HostProber`] backed by real network I/O.

use super::traits::{HostProber, ReachabilityMethod};
use super::{ping, tcp};
use crate::types::Port;
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Upper bound on a reverse lookup.
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(2);

/// Probes hosts over the network.
///
/// Reachability uses the mechanism selected at construction; port probes are
/// always TCP connects.
pub struct SystemProber {
    method: ReachabilityMethod,
    resolver: TokioAsyncResolver,
}

impl SystemProber {
    /// Create a prober using the system resolver configuration when available.
    pub fn new(method: ReachabilityMethod) -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            debug!(error = %e, "system resolver config unavailable, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { method, resolver }
    }

    pub fn method(&self) -> ReachabilityMethod {
        self.method
    }
}

#[async_trait]
impl HostProber for SystemProber {
    async fn probe_reachability(&self, addr: IpAddr, limit: Duration) -> bool {
        let up = match self.method {
            ReachabilityMethod::Ping => ping::ping(addr, limit).await,
            ReachabilityMethod::Tcp => tcp::is_host_up(addr, limit).await,
        };
        debug!(%addr, method = %self.method, up, "reachability probe");
        up
    }

    async fn probe_port(&self, addr: IpAddr, port: Port, limit: Duration) -> bool {
        let open = tcp::is_port_open(addr, port.as_u16(), limit).await;
        debug!(%addr, %port, open, "port probe");
        open
    }

    async fn resolve_hostname(&self, addr: IpAddr) -> Option<String> {
        let lookup = match timeout(RESOLVE_TIMEOUT, self.resolver.reverse_lookup(addr)).await {
            Ok(Ok(lookup)) => lookup,
            Ok(Err(e)) => {
                debug!(%addr, error = %e, "reverse lookup failed");
                return None;
            }
            Err(_) => {
                debug!(%addr, "reverse lookup timed out");
                return None;
            }
        };
        lookup
            .iter()
            .next()
            .map(|name| name.to_string().trim_end_matches('.').to_string())
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[tokio::test]
    async fn test_probe_port_against_listener() {
        let prober = SystemProber::new(ReachabilityMethod::Tcp);
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        assert!(prober.probe_port(LOCALHOST, port, Duration::from_secs(1)).await);
        drop(listener);
        assert!(!prober.probe_port(LOCALHOST, port, Duration::from_millis(500)).await);
    }

    #[tokio::test]
    async fn test_tcp_reachability_of_localhost() {
        let prober = SystemProber::new(ReachabilityMethod::Tcp);
        assert_eq!(prober.method(), ReachabilityMethod::Tcp);
        assert!(prober.probe_reachability(LOCALHOST, Duration::from_secs(1)).await);
    }
}
