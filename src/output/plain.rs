//! Plain text output formatting.
//!
//! Produces human-readable output with colors. Open ports are announced
//! as they are found by [`ConsoleObserver`]; the sorted summary follows
//! once the scan returns.

use crate::scanner::{HostState, PortResult, ScanObserver, ScanReport};
use crate::types::ScanTarget;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::net::Ipv4Addr;

/// Write the final summary for a finished or cancelled scan.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    )?;
    writeln!(
        out,
        "                  {} Scan Results",
        style("portprobe").cyan().bold()
    )?;
    writeln!(
        out,
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    )?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target.host())?;
    writeln!(out, "  {} {}", style("Ports:").bold(), report.target.ports())?;
    writeln!(out, "  {} {}", style("Host:").bold(), report.host_state)?;
    writeln!(out)?;

    writeln!(
        out,
        "  {} {} ports probed in {:.2}s",
        style("Statistics:").bold(),
        report.ports_probed,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "               {} open, {} closed, {} filtered",
        style(report.open_ports.len()).green().bold(),
        style(report.closed_ports).red(),
        style(report.filtered_ports).yellow()
    )?;
    if report.cancelled {
        writeln!(
            out,
            "  {} scan interrupted, {} ports not probed",
            style("Note:").yellow().bold(),
            report.target.ports().len() - report.ports_probed
        )?;
    }
    writeln!(out)?;

    if report.open_ports.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        let ports: Vec<String> = report.open_ports.iter().map(|p| p.to_string()).collect();
        writeln!(
            out,
            "  {} {}",
            style("Open ports:").bold(),
            style(ports.join(", ")).green()
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    )?;
    writeln!(out)?;

    Ok(())
}

/// Print results in human-readable plain text format.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plain(&mut out, report)
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &ScanTarget) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portprobe").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Target: {}",
        style("•").dim(),
        style(target.host()).white().bold()
    );
    println!(
        "{} Scanning {} ports ({})...",
        style("•").dim(),
        style(target.ports().len()).white().bold(),
        target.ports()
    );
    println!();
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
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Announces scan progress on the terminal while the scan runs.
pub struct ConsoleObserver {
    progress: Option<ProgressBar>,
    quiet: bool,
}

impl ConsoleObserver {
    /// A progress bar is only drawn in verbose mode.
    pub fn new(target: &ScanTarget, verbose: bool, quiet: bool) -> Self {
        let progress = verbose.then(|| {
            let pb = ProgressBar::new(target.ports().len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            {
                pb.set_style(style.progress_chars("=>-"));
            }
            pb
        });

        Self { progress, quiet }
    }

    /// Clear the progress bar once the scan has returned.
    pub fn finish(&self, report: &ScanReport) {
        if let Some(pb) = &self.progress {
            if report.cancelled {
                pb.abandon_with_message("Scan interrupted");
            } else {
                pb.finish_with_message("Scan complete");
            }
        }
    }

    fn line(&self, msg: String) {
        match &self.progress {
            Some(pb) => pb.println(msg),
            None => println!("{}", msg),
        }
    }
}

impl ScanObserver for ConsoleObserver {
    fn on_liveness(&self, host: Ipv4Addr, state: HostState) {
        if self.quiet {
            return;
        }
        match state {
            HostState::Alive => {
                self.line(format!("Device detected at {}, starting scan...", host));
            }
            _ => print_warning(&format!(
                "No response from {}, scanning anyway (ping may be blocked).",
                host
            )),
        }
    }

    fn on_open(&self, host: Ipv4Addr, result: &PortResult) {
        self.line(format!(
            "{} Port {} is open on {}",
            style("✓").green().bold(),
            style(result.port).green().bold(),
            host
        ));
        if let Some(pb) = &self.progress {
            pb.set_message(format!("Found open port: {}", result.port));
        }
    }

    fn on_probe_complete(&self, _result: &PortResult) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }
}
