//! Target specification types with CIDR and address-range support.
//!
//! Provides target parsing supporting:
//! - Single IP addresses (IPv4 and IPv6)
//! - CIDR notation (192.168.1.0/24)
//! - Address ranges (10.0.0.1-10.0.0.20, or the shorthand 10.0.0.1-20)
//!
//! Expansion always yields unique addresses in ascending numeric order.

use ipnetwork::IpNetwork;
use std::collections::BTreeSet;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Error type for target parsing and expansion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target format: {0}")]
    InvalidFormat(String),
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),
    #[error("invalid address range: {0}")]
    InvalidRange(String),
    #[error("target range too large: {0} addresses (max: {1})")]
    TooLarge(u128, u128),
    #[error("invalid host range '{0}': expected START-END within 1-254 with START <= END")]
    InvalidHostRange(String),
    #[error("no targets specified")]
    Empty,
}

/// A parsed target specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A single IP address.
    Single(IpAddr),
    /// A CIDR network block.
    Cidr(IpNetwork),
    /// An inclusive address range within one IP family.
    Range(IpAddr, IpAddr),
}

impl TargetSpec {
    /// Maximum number of addresses one expansion may yield, after host
    /// filtering. Large enough for a full IPv4 /8.
    pub const MAX_HOSTS: u128 = 1 << 24;

    /// Parse a target specification from a string.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TargetError::Empty);
        }

        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self::Single(ip));
        }

        if s.contains('/') {
            let network: IpNetwork = s
                .parse()
                .map_err(|_| TargetError::InvalidCidr(s.to_string()))?;
            return Ok(Self::Cidr(network));
        }

        if let Some((start, end)) = s.split_once('-') {
            let start: IpAddr = start
                .trim()
                .parse()
                .map_err(|_| TargetError::InvalidRange(s.to_string()))?;
            let end = parse_range_end(start, end.trim())
                .ok_or_else(|| TargetError::InvalidRange(s.to_string()))?;
            if addr_value(start) > addr_value(end) {
                return Err(TargetError::InvalidRange(s.to_string()));
            }
            return Ok(Self::Range(start, end));
        }

        Err(TargetError::InvalidFormat(s.to_string()))
    }

    /// First and last host address as integers, inclusive.
    ///
    /// IPv4 blocks wider than /31 drop their network and broadcast addresses.
    fn bounds(&self) -> (u128, u128) {
        match self {
            Self::Single(ip) => (addr_value(*ip), addr_value(*ip)),
            Self::Cidr(IpNetwork::V4(net)) => {
                let first = u128::from(u32::from(net.network()));
                let last = u128::from(u32::from(net.broadcast()));
                if net.prefix() < 31 {
                    (first + 1, last - 1)
                } else {
                    (first, last)
                }
            }
            Self::Cidr(IpNetwork::V6(net)) => {
                let mask = u128::from(net.mask());
                let first = u128::from(net.ip()) & mask;
                (first, first | !mask)
            }
            Self::Range(start, end) => (addr_value(*start), addr_value(*end)),
        }
    }

    /// Upper bound on how many addresses [`hosts`](Self::hosts) yields.
    pub fn host_count_bound(&self, host_range: Option<HostRange>) -> u128 {
        let (first, last) = self.bounds();
        match host_range {
            None => (last - first).saturating_add(1),
            Some(range) => ((last >> 8) - (first >> 8) + 1).saturating_mul(range.width()),
        }
    }

    /// Host addresses in ascending order, optionally limited to a host range.
    ///
    /// With a host range only the matching final octets of each /24 (or
    /// final-byte block for IPv6) are generated, so a filtered wide block
    /// costs no more than its result.
    pub fn hosts(&self, host_range: Option<HostRange>) -> Box<dyn Iterator<Item = IpAddr> + '_> {
        let (first, last) = self.bounds();
        let v4 = self.is_ipv4();
        match host_range {
            None => Box::new((first..=last).map(move |value| value_to_addr(value, v4))),
            Some(range) => Box::new(
                ((first >> 8)..=(last >> 8))
                    .flat_map(move |block| {
                        (range.start..=range.end).map(move |octet| (block << 8) | u128::from(octet))
                    })
                    .filter(move |value| (first..=last).contains(value))
                    .map(move |value| value_to_addr(value, v4)),
            ),
        }
    }

    fn is_ipv4(&self) -> bool {
        match self {
            Self::Single(ip) | Self::Range(ip, _) => ip.is_ipv4(),
            Self::Cidr(network) => network.is_ipv4(),
        }
    }
}

impl FromStr for TargetSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(ip) => write!(f, "{}", ip),
            Self::Cidr(network) => write!(f, "{}", network),
            Self::Range(start, end) => write!(f, "{}-{}", start, end),
        }
    }
}

/// Post-filter on the final octet of each address, e.g. "hosts 1 to 50".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRange {
    start: u8,
    end: u8,
}

impl HostRange {
    /// Lowest permitted host index.
    pub const MIN: u8 = 1;
    /// Highest permitted host index.
    pub const MAX: u8 = 254;

    /// Create a host range, validating bounds and ordering.
    pub fn new(start: u8, end: u8) -> Result<Self, TargetError> {
        if start < Self::MIN || end > Self::MAX || start > end {
            return Err(TargetError::InvalidHostRange(format!("{}-{}", start, end)));
        }
        Ok(Self { start, end })
    }

    /// Number of host indexes in the range.
    pub fn width(&self) -> u128 {
        u128::from(self.end - self.start) + 1
    }

    /// Whether the address's final octet falls inside the range.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        let last = match ip {
            IpAddr::V4(v4) => v4.octets()[3],
            IpAddr::V6(v6) => v6.octets()[15],
        };
        (self.start..=self.end).contains(&last)
    }
}

impl FromStr for HostRange {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TargetError::InvalidHostRange(s.trim().to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let start: u8 = start.trim().parse().map_err(|_| invalid())?;
        let end: u8 = end.trim().parse().map_err(|_| invalid())?;
        Self::new(start, end).map_err(|_| invalid())
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Expand one or more target specifications into a sorted, deduplicated
/// address list, optionally filtered by host index.
pub fn expand_targets<S: AsRef<str>>(
    specs: &[S],
    host_range: Option<HostRange>,
) -> Result<Vec<IpAddr>, TargetError> {
    let parsed = specs
        .iter()
        .map(|s| TargetSpec::parse(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    if parsed.is_empty() {
        return Err(TargetError::Empty);
    }

    let max = TargetSpec::MAX_HOSTS;
    for spec in &parsed {
        let bound = spec.host_count_bound(host_range);
        if bound > max {
            return Err(TargetError::TooLarge(bound, max));
        }
    }

    let mut addresses = BTreeSet::new();
    for spec in &parsed {
        addresses.extend(spec.hosts(host_range));
        if addresses.len() as u128 > max {
            return Err(TargetError::TooLarge(addresses.len() as u128, max));
        }
    }

    // IpAddr orders every V4 before every V6, numerically within a family.
    Ok(addresses.into_iter().collect())
}

/// Parse the right-hand side of `A-B`: a full address or a last-octet shorthand.
fn parse_range_end(start: IpAddr, end: &str) -> Option<IpAddr> {
    if let Ok(ip) = end.parse::<IpAddr>() {
        return (ip.is_ipv4() == start.is_ipv4()).then_some(ip);
    }
    match start {
        IpAddr::V4(v4) => {
            let last: u8 = end.parse().ok()?;
            let [a, b, c, _] = v4.octets();
            Some(IpAddr::V4(Ipv4Addr::new(a, b, c, last)))
        }
        IpAddr::V6(_) => None,
    }
}

fn addr_value(ip: IpAddr) -> u128 {
    match ip {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

fn value_to_addr(value: u128, v4: bool) -> IpAddr {
    if v4 {
        // Callers only pass values that came from an IPv4 address.
        IpAddr::V4(Ipv4Addr::from(value as u32))
    } else {
        IpAddr::V6(Ipv6Addr::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(ips: &[IpAddr]) -> Vec<String> {
        ips.iter().map(|ip| ip.to_string()).collect()
    }

    #[test]
    fn test_parse_forms() {
        assert!(matches!(
            TargetSpec::parse("192.168.1.1").unwrap(),
            TargetSpec::Single(IpAddr::V4(_))
        ));
        assert!(matches!(
            TargetSpec::parse("::1").unwrap(),
            TargetSpec::Single(IpAddr::V6(_))
        ));
        assert!(matches!(
            TargetSpec::parse("10.0.0.0/24").unwrap(),
            TargetSpec::Cidr(_)
        ));
        assert!(matches!(
            TargetSpec::parse("10.0.0.1-10.0.0.9").unwrap(),
            TargetSpec::Range(_, _)
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            TargetSpec::parse("example.com"),
            Err(TargetError::InvalidFormat(_))
        ));
        assert!(matches!(
            TargetSpec::parse("10.0.0.0/40"),
            Err(TargetError::InvalidCidr(_))
        ));
        assert!(matches!(
            TargetSpec::parse("10.0.0.9-10.0.0.1"),
            Err(TargetError::InvalidRange(_))
        ));
        assert!(matches!(
            TargetSpec::parse("10.0.0.1-::5"),
            Err(TargetError::InvalidRange(_))
        ));
        assert_eq!(TargetSpec::parse("  "), Err(TargetError::Empty));
    }

    #[test]
    fn test_slash_30_excludes_network_and_broadcast() {
        let hosts = expand_targets(&["192.168.1.0/30"], None).unwrap();
        assert_eq!(strings(&hosts), vec!["192.168.1.1", "192.168.1.2"]);
    }

    #[test]
    fn test_cidr_host_counts() {
        for prefix in 16..=30u32 {
            let spec = format!("172.16.0.0/{}", prefix);
            let hosts = expand_targets(&[spec.as_str()], None).unwrap();
            assert_eq!(hosts.len() as u64, (1u64 << (32 - prefix)) - 2, "/{}", prefix);
            assert!(hosts.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_slash_31_and_32_keep_all_addresses() {
        assert_eq!(expand_targets(&["10.0.0.0/31"], None).unwrap().len(), 2);
        assert_eq!(
            strings(&expand_targets(&["10.0.0.7/32"], None).unwrap()),
            vec!["10.0.0.7"]
        );
    }

    #[test]
    fn test_cidr_with_host_bits_set() {
        let hosts = expand_targets(&["192.168.1.5/30"], None).unwrap();
        assert_eq!(strings(&hosts), vec!["192.168.1.5", "192.168.1.6"]);
    }

    #[test]
    fn test_single_address_expands_to_itself() {
        let hosts = expand_targets(&["10.1.2.3"], None).unwrap();
        assert_eq!(strings(&hosts), vec!["10.1.2.3"]);
    }

    #[test]
    fn test_address_ranges() {
        let full = expand_targets(&["10.0.0.250-10.0.1.2"], None).unwrap();
        assert_eq!(full.len(), 9);
        assert_eq!(full[0].to_string(), "10.0.0.250");
        assert_eq!(full[8].to_string(), "10.0.1.2");

        let short = expand_targets(&["10.0.0.3-5"], None).unwrap();
        assert_eq!(strings(&short), vec!["10.0.0.3", "10.0.0.4", "10.0.0.5"]);
    }

    #[test]
    fn test_multiple_specs_dedup_and_sort() {
        let hosts =
            expand_targets(&["10.0.0.5", "10.0.0.0/29", "10.0.0.2-3", "10.0.0.1"], None).unwrap();
        assert_eq!(
            strings(&hosts),
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4", "10.0.0.5", "10.0.0.6"]
        );
    }

    #[test]
    fn test_host_range_filter() {
        let range: HostRange = "1-50".parse().unwrap();
        let hosts = expand_targets(&["192.168.7.0/24"], Some(range)).unwrap();
        assert_eq!(hosts.len(), 50);
        assert_eq!(hosts[0].to_string(), "192.168.7.1");
        assert_eq!(hosts[49].to_string(), "192.168.7.50");
    }

    #[test]
    fn test_wide_blocks_expand_fully() {
        let hosts = expand_targets(&["10.0.0.0/15"], None).unwrap();
        assert_eq!(hosts.len(), (1 << 17) - 2);
        assert_eq!(hosts[0].to_string(), "10.0.0.1");
        assert_eq!(hosts[hosts.len() - 1].to_string(), "10.1.255.254");
    }

    #[test]
    fn test_host_range_applies_before_size_limit() {
        let range: HostRange = "1-5".parse().unwrap();
        let hosts = expand_targets(&["10.0.0.0/15"], Some(range)).unwrap();
        assert_eq!(hosts.len(), 512 * 5);
        assert!(hosts.iter().all(|ip| range.contains(ip)));
        assert_eq!(
            strings(&hosts[..6]),
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4", "10.0.0.5", "10.0.1.1"]
        );

        let hosts = expand_targets(&["10.0.0.0/8"], Some(range)).unwrap();
        assert_eq!(hosts.len(), 65536 * 5);
    }

    #[test]
    fn test_size_limit_on_result() {
        assert!(matches!(
            expand_targets(&["0.0.0.0/0"], None),
            Err(TargetError::TooLarge(_, _))
        ));
        assert!(matches!(
            expand_targets(&["2001:db8::/64"], "1-10".parse().ok()),
            Err(TargetError::TooLarge(_, _))
        ));
        let hosts = expand_targets(&["2001:db8::/120"], "1-3".parse().ok()).unwrap();
        assert_eq!(strings(&hosts), vec!["2001:db8::1", "2001:db8::2", "2001:db8::3"]);
    }

    #[test]
    fn test_host_range_validation() {
        assert!("0-10".parse::<HostRange>().is_err());
        assert!("10-255".parse::<HostRange>().is_err());
        assert!("50-10".parse::<HostRange>().is_err());
        assert!("abc".parse::<HostRange>().is_err());
        assert!(HostRange::new(1, 254).is_ok());
        assert_eq!("5-5".parse::<HostRange>().unwrap().to_string(), "5-5");
    }

    #[test]
    fn test_invalid_spec_fails_whole_expansion() {
        let result = expand_targets(&["10.0.0.1", "not-an-address"], None);
        assert!(result.is_err());
        let empty: [&str; 0] = [];
        assert_eq!(expand_targets(&empty, None), Err(TargetError::Empty));
    }
}
