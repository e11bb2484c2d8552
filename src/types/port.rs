//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSelection` captures what the operator asked the scanner to probe.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Every valid port, ascending.
    pub fn all() -> impl Iterator<Item = Port> {
        (Self::MIN..=Self::MAX).map(Port)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// The set of ports to probe on each reachable host.
///
/// Accepted text forms:
/// - `none` or an empty string: reachability only
/// - `all`, `-`, `1-65535` or any list covering every port: full sweep
/// - a list such as `22,80,443,8000-8010`, probed in the given order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PortSelection {
    /// No port probes; hosts are only checked for reachability.
    #[default]
    None,
    /// Explicit ports, deduplicated, in caller order.
    List(Vec<Port>),
    /// Every port from 1 to 65535.
    Full,
}

impl PortSelection {
    /// Whether any port probing was requested.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::List(ports) => ports.is_empty(),
            Self::Full => false,
        }
    }

    /// Whether this is a full 1-65535 sweep.
    pub fn is_full_sweep(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Number of ports probed per reachable host.
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::List(ports) => ports.len(),
            Self::Full => usize::from(Port::MAX),
        }
    }

    /// Ports in probe order.
    pub fn ports(&self) -> Box<dyn Iterator<Item = Port> + Send + '_> {
        match self {
            Self::None => Box::new(std::iter::empty()),
            Self::List(ports) => Box::new(ports.iter().copied()),
            Self::Full => Box::new(Port::all()),
        }
    }
}

impl FromStr for PortSelection {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "" | "none" => return Ok(Self::None),
            "all" | "-" | "1-65535" => return Ok(Self::Full),
            _ => {}
        }

        let mut ports: Vec<Port> = Vec::new();
        let mut seen: HashSet<Port> = HashSet::new();
        let mut push = |port: Port| {
            if seen.insert(port) {
                ports.push(port);
            }
        };

        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_port(start)?;
                let end = parse_port(end)?;
                if start > end {
                    return Err(PortError::InvalidRange(start.0, end.0));
                }
                (start.0..=end.0).map(Port).for_each(&mut push);
            } else {
                push(parse_port(part)?);
            }
        }

        if ports.is_empty() {
            return Err(PortError::Empty);
        }
        // Any spelling that covers every port is a full sweep.
        if ports.len() == usize::from(Port::MAX) {
            return Ok(Self::Full);
        }
        Ok(Self::List(ports))
    }
}

impl fmt::Display for PortSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Full => write!(f, "1-65535"),
            Self::List(ports) => {
                let parts: Vec<String> = ports.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

fn parse_port(s: &str) -> Result<Port, PortError> {
    let s = s.trim();
    let raw: u16 = s
        .parse()
        .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
    Port::try_from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(sel: &PortSelection) -> Vec<u16> {
        sel.ports().map(Port::as_u16).collect()
    }

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
        assert_eq!(Port::try_from(0), Err(PortError::OutOfRange(0)));
    }

    #[test]
    fn test_selection_keeps_caller_order() {
        let sel: PortSelection = "443,22,80".parse().unwrap();
        assert_eq!(list(&sel), vec![443, 22, 80]);
    }

    #[test]
    fn test_selection_ranges_and_dedup() {
        let sel: PortSelection = "22,80,80,100-102,22".parse().unwrap();
        assert_eq!(list(&sel), vec![22, 80, 100, 101, 102]);
        assert_eq!(sel.len(), 5);
    }

    #[test]
    fn test_selection_none_and_full() {
        assert_eq!("none".parse::<PortSelection>().unwrap(), PortSelection::None);
        assert_eq!("".parse::<PortSelection>().unwrap(), PortSelection::None);
        assert!("all".parse::<PortSelection>().unwrap().is_full_sweep());
        assert!("1-65535".parse::<PortSelection>().unwrap().is_full_sweep());
        assert_eq!(PortSelection::Full.len(), 65535);
        assert!(PortSelection::None.is_empty());
    }

    #[test]
    fn test_selection_covering_every_port_is_full() {
        for input in ["1 - 65535", "1-32767,32768-65535", "22,1-65535"] {
            let sel: PortSelection = input.parse().unwrap();
            assert!(sel.is_full_sweep(), "{input}");
        }
        assert!(!"2-65535".parse::<PortSelection>().unwrap().is_full_sweep());
    }

    #[test]
    fn test_large_list_parses_quickly() {
        let start = std::time::Instant::now();
        let sel: PortSelection = "2-65535,1-100".parse().unwrap();
        assert!(sel.is_full_sweep());
        let sel: PortSelection = "1-60000".parse().unwrap();
        assert_eq!(sel.len(), 60000);
        assert!(start.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_selection_errors() {
        assert_eq!(
            "100-50".parse::<PortSelection>(),
            Err(PortError::InvalidRange(100, 50))
        );
        assert_eq!("0".parse::<PortSelection>(), Err(PortError::OutOfRange(0)));
        assert!(matches!(
            "http".parse::<PortSelection>(),
            Err(PortError::InvalidFormat(_))
        ));
        assert_eq!(",".parse::<PortSelection>(), Err(PortError::Empty));
    }

    #[test]
    fn test_selection_display() {
        let sel: PortSelection = "22,80".parse().unwrap();
        assert_eq!(sel.to_string(), "22,80");
        assert_eq!(PortSelection::Full.to_string(), "1-65535");
    }
}
