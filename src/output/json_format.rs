//! JSON output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write the report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

/// Print results in JSON format.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_json(&mut stdout.lock(), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::HostState;
    use crate::types::{Port, ScanTarget};
    use chrono::Utc;

    #[test]
    fn test_json_shape() {
        let report = ScanReport {
            target: ScanTarget::parse("10.0.0.1", 5000, 5000).unwrap(),
            host_state: HostState::Unknown,
            open_ports: vec![Port::new(5000)],
            ports_probed: 1,
            closed_ports: 0,
            filtered_ports: 0,
            skipped_ports: 0,
            cancelled: false,
            started_at: Utc::now(),
            duration_ms: 3,
        };

        let mut buf = Vec::new();
        write_json(&mut buf, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["target"]["host"], "10.0.0.1");
        assert_eq!(value["host_state"], "unknown");
        assert_eq!(value["open_ports"], serde_json::json!([5000]));
        assert_eq!(value["cancelled"], false);
    }
}
