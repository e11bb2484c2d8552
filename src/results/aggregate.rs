//! Merging passively observed hosts with actively probed ones.

use super::{HostMap, Source};
use tracing::debug;

/// Combine passive and active records into one map keyed by address.
///
/// Every address from either side appears exactly once. On overlap the
/// active record wins, except that a hostname only the passive side knows
/// is kept. Passive records never carry ports.
pub fn merge(passive: HostMap, active: HostMap) -> HostMap {
    let mut merged = passive;

    for (address, mut record) in active {
        if let Some(seen) = merged.remove(&address) {
            debug!(%address, "host seen both passively and actively");
            record.source = Source::Active;
            if record.hostname.is_none() {
                record.hostname = seen.hostname;
            }
        }
        merged.insert(address, record);
    }

    merged
}
