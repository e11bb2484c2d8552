//! Plain text output formatting.
//!
//! Produces a human-readable summary with colors and formatting.

use crate::results::{HostRecord, ScanResultSet};
use console::style;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Print the scan summary to stdout.
pub fn print_plain(set: &ScanResultSet) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_summary(&mut out, set)
}

/// Write the scan summary to any writer.
pub fn render_summary<W: Write>(out: &mut W, set: &ScanResultSet) -> io::Result<()> {
    let meta = &set.metadata;
    let active: Vec<&HostRecord> = set.active_hosts().collect();

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out, "                      {}", style("Scan Summary").cyan().bold())?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Engagement:").bold(), meta.engagement)?;
    writeln!(out, "  {} {}", style("Window:").bold(), meta.scan_window)?;
    writeln!(
        out,
        "  {} {:.2}s between probes",
        style("Pacing:").bold(),
        meta.rate_limit.as_secs_f64()
    )?;
    writeln!(
        out,
        "  {} {} known, {} active",
        style("Hosts:").bold(),
        set.hosts.len(),
        active.len()
    )?;

    writeln!(out)?;
    writeln!(out, "  {}", style(format!("Active hosts ({}):", active.len())).bold())?;
    if active.is_empty() {
        writeln!(out, "    {}", style("(none)").dim())?;
    }
    for host in &active {
        let label = host_label(host);
        if host.has_open_ports() {
            let ports: Vec<String> = host.ports.iter().map(|p| p.port.to_string()).collect();
            writeln!(
                out,
                "    - {:<15} [{}]",
                style(label).green(),
                ports.join(", ")
            )?;
        } else {
            writeln!(out, "    - {}", style(label).green())?;
        }
    }

    if meta.ports_scanned {
        let with_ports: Vec<&HostRecord> = set.hosts_with_open_ports().collect();
        writeln!(out)?;
        writeln!(
            out,
            "  {}",
            style(format!("Hosts with open ports ({}):", with_ports.len())).bold()
        )?;
        if with_ports.is_empty() {
            writeln!(out, "    {}", style("(none)").dim())?;
        }
        for host in with_ports {
            let services: Vec<String> = host
                .ports
                .iter()
                .map(|p| format!("{}/{}", p.port, p.service))
                .collect();
            writeln!(out, "    - {:<15} {}", host_label(host), style(services.join(" ")).dim())?;
        }
    }

    if !meta.completed {
        writeln!(out)?;
        writeln!(
            out,
            "  {} scan window closed before all hosts were scanned; results are partial",
            style("Note:").yellow().bold()
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

fn host_label(host: &HostRecord) -> String {
    match &host.hostname {
        Some(name) => format!("{} ({})", host.address, name),
        None => host.address.to_string(),
    }
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{PortProbeResult, ScanMetadata};
    use crate::types::{Port, ScanWindow};
    use std::net::IpAddr;
    use std::time::Duration;

    fn render(set: &ScanResultSet) -> String {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        render_summary(&mut buf, set).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample(ports_scanned: bool) -> ScanResultSet {
        let meta = ScanMetadata::new(Duration::from_millis(200), ScanWindow::always(), ports_scanned);
        let mut set = ScanResultSet::new(meta);
        let web: IpAddr = "10.0.0.2".parse().unwrap();
        let idle: IpAddr = "10.0.0.3".parse().unwrap();
        let down: IpAddr = "10.0.0.4".parse().unwrap();
        let mut record = HostRecord::reachable(web).with_hostname(Some("web".into()));
        record
            .ports
            .push(PortProbeResult::new(Port::new(80).unwrap(), true, "http"));
        set.hosts.insert(web, record);
        set.hosts.insert(idle, HostRecord::reachable(idle));
        set.hosts.insert(down, HostRecord::unreachable(down));
        set
    }

    #[test]
    fn test_summary_lists_active_hosts() {
        let text = render(&sample(true));
        assert!(text.contains("Active hosts (2):"));
        assert!(text.contains("10.0.0.2 (web)"));
        assert!(text.contains("[80]"));
        assert!(text.contains("Hosts with open ports (1):"));
        assert!(text.contains("80/http"));
        assert!(!text.contains("10.0.0.4"));
        assert!(!text.contains("partial"));
    }

    #[test]
    fn test_summary_without_port_scan_or_hosts() {
        let meta = ScanMetadata::new(Duration::ZERO, ScanWindow::always(), false);
        let text = render(&ScanResultSet::new(meta));
        assert!(text.contains("Active hosts (0):"));
        assert!(text.contains("(none)"));
        assert!(!text.contains("Hosts with open ports"));
    }

    #[test]
    fn test_partial_scan_notice() {
        let mut set = sample(true);
        set.metadata.completed = false;
        assert!(render(&set).contains("results are partial"));
    }
}
