//! CSV output formatting.
//!
//! One row per open port; hosts without open ports get a single row with an
//! empty port column.

use crate::results::ScanResultSet;
use std::io::{self, Write};

/// Print results in CSV format.
pub fn print_csv(set: &ScanResultSet) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), set)
}

/// Write results as CSV to any writer.
pub fn write_csv<W: Write>(writer: W, set: &ScanResultSet) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["address", "active", "source", "hostname", "port", "service"])?;

    for (address, host) in &set.hosts {
        let address = address.to_string();
        let active = host.active.to_string();
        let source = host.source.to_string();
        let hostname = host.hostname.as_deref().unwrap_or("");

        if host.ports.is_empty() {
            wtr.write_record([address.as_str(), active.as_str(), source.as_str(), hostname, "", ""])?;
        }
        for port in &host.ports {
            wtr.write_record([
                address.as_str(),
                active.as_str(),
                source.as_str(),
                hostname,
                port.port.to_string().as_str(),
                port.service.as_str(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
