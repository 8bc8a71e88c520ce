//! CSV output formatting.

use crate::scanner::{PortState, ScanReport};
use std::io::{self, Write};

/// Write one `host,port,state` row per open port.
pub fn write_csv<W: Write>(out: W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    let host = report.target.host().to_string();

    wtr.write_record(["host", "port", "state"])?;
    for port in &report.open_ports {
        wtr.write_record([host.as_str(), &port.to_string(), &PortState::Open.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Print results in CSV format.
pub fn print_csv(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::HostState;
    use crate::types::{Port, ScanTarget};
    use chrono::Utc;

    #[test]
    fn test_csv_rows() {
        let report = ScanReport {
            target: ScanTarget::parse("10.0.0.1", 1, 100).unwrap(),
            host_state: HostState::Alive,
            open_ports: vec![Port::new(22), Port::new(80)],
            ports_probed: 100,
            closed_ports: 98,
            filtered_ports: 0,
            skipped_ports: 0,
            cancelled: false,
            started_at: Utc::now(),
            duration_ms: 40,
        };

        let mut buf = Vec::new();
        write_csv(&mut buf, &report).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "host,port,state\n10.0.0.1,22,open\n10.0.0.1,80,open\n"
        );
    }
}
