//! Service naming based on well-known port numbers.
//!
//! The built-in table only covers the ports an engagement scans by default;
//! operators extend it through the `services` map in the settings file.

use std::collections::HashMap;

/// Name reported for ports missing from the table.
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Built-in port to service name entries.
const DEFAULT_SERVICES: [(u16, &str); 4] = [(22, "ssh"), (80, "http"), (443, "https"), (3389, "rdp")];

/// Maps port numbers to canonical service names.
#[derive(Debug, Clone)]
pub struct ServiceResolver {
    table: HashMap<u16, String>,
}

impl ServiceResolver {
    /// Create a resolver holding only the built-in entries.
    pub fn new() -> Self {
        Self {
            table: DEFAULT_SERVICES
                .iter()
                .map(|&(port, name)| (port, name.to_string()))
                .collect(),
        }
    }

    /// Add or override entries.
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (u16, S)>,
        S: Into<String>,
    {
        self.table
            .extend(entries.into_iter().map(|(port, name)| (port, name.into())));
        self
    }

    /// Look up the service name for a port, falling back to "unknown".
    pub fn resolve(&self, port: u16) -> &str {
        self.table
            .get(&port)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SERVICE)
    }

    /// Number of known ports.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for ServiceResolver {
    fn default() -> Self {
        Self::new()
    }
}
