//! Scan command implementation.
//!
//! Merges settings with command-line overrides, validates the target, wires
//! Ctrl-C to the cancellation token and hands the report to the formatter.

use super::{Cli, OutputFormat};
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output::{self, ConsoleObserver};
use crate::scanner::{
    CancellationToken, Coordinator, NoopObserver, PingProber, ScanObserver, ScanReport,
    TcpConnectProber,
};
use crate::types::ScanTarget;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Effective options after applying command-line overrides to settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub concurrency: usize,
    pub timeout: Duration,
    pub liveness_timeout: Duration,
    pub liveness_check: bool,
    pub output: OutputFormat,
}

impl ScanOptions {
    pub fn resolve(cli: &Cli, settings: &AppSettings) -> CliResult<Self> {
        let output = match cli.output {
            Some(format) => format,
            None => OutputFormat::from_setting(&settings.output_format)?,
        };

        Ok(Self {
            concurrency: cli.concurrency.unwrap_or(settings.concurrency),
            timeout: cli
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| settings.timeout()),
            liveness_timeout: settings.liveness_timeout(),
            liveness_check: settings.liveness_check && !cli.no_ping,
            output,
        })
    }
}

/// Load settings from `--config` or the default location.
pub fn load_settings(cli: &Cli) -> CliResult<AppSettings> {
    let settings = match &cli.config {
        Some(path) => AppSettings::load_from(path)?,
        None => AppSettings::load()?,
    };
    Ok(settings)
}

/// Execute a scan as described by the command line.
///
/// Validation happens before any network activity. An interrupt cancels
/// the scan and the partial report is still printed.
pub async fn execute(cli: &Cli) -> CliResult<ScanReport> {
    let target = ScanTarget::new(&cli.host, cli.port_range()?)?;
    let settings = load_settings(cli)?;
    let options = ScanOptions::resolve(cli, &settings)?;
    debug!(?options, %target, "resolved scan options");

    let plain = options.output == OutputFormat::Plain;
    if plain && !cli.quiet {
        output::print_scan_header(&target);
    }

    let console = plain.then(|| Arc::new(ConsoleObserver::new(&target, cli.verbose, cli.quiet)));
    let observer: Arc<dyn ScanObserver> = match &console {
        Some(console) => Arc::clone(console) as Arc<dyn ScanObserver>,
        None => Arc::new(NoopObserver),
    };

    let mut coordinator = Coordinator::new(TcpConnectProber::new(options.timeout))
        .with_concurrency(options.concurrency)
        .with_observer(observer);
    if options.liveness_check {
        coordinator = coordinator.with_liveness(PingProber::new(options.liveness_timeout));
    }

    let cancel = CancellationToken::new();
    cancel.cancel_on_ctrl_c();

    let report = coordinator.scan(&target, &cancel).await;

    if let Some(console) = console {
        console.finish(&report);
        if report.cancelled && !cli.quiet {
            output::print_info("Scan interrupted, showing partial results.");
        }
    }
    output::print_results(&report, options.output)?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CliError, ValidationError};
    use clap::Parser;
    use tokio_test::{assert_err, assert_ok};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("portprobe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_settings_used_without_overrides() {
        let settings = AppSettings {
            concurrency: 64,
            timeout_ms: 250,
            output_format: "csv".into(),
            ..AppSettings::default()
        };
        let args = cli(&["-i", "10.0.0.1", "-s"]);
        let options = assert_ok!(ScanOptions::resolve(&args, &settings));

        assert_eq!(options.concurrency, 64);
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert_eq!(options.output, OutputFormat::Csv);
        assert!(options.liveness_check);
    }

    #[test]
    fn test_flags_override_settings() {
        let args = cli(&[
            "-i", "10.0.0.1", "-s", "-c", "8", "-t", "100", "-o", "json", "--no-ping",
        ]);
        let options = assert_ok!(ScanOptions::resolve(&args, &AppSettings::default()));

        assert_eq!(options.concurrency, 8);
        assert_eq!(options.timeout, Duration::from_millis(100));
        assert_eq!(options.output, OutputFormat::Json);
        assert!(!options.liveness_check);
    }

    #[test]
    fn test_unknown_output_setting() {
        let settings = AppSettings {
            output_format: "yaml".into(),
            ..AppSettings::default()
        };
        let args = cli(&["-i", "10.0.0.1", "-s"]);
        let err = assert_err!(ScanOptions::resolve(&args, &settings));
        assert!(matches!(err, CliError::Config(_)));
    }

    #[tokio::test]
    async fn test_malformed_host_rejected_before_scanning() {
        let err = assert_err!(execute(&cli(&["-i", "localhost", "-a"])).await);
        assert!(matches!(
            err,
            CliError::Validation(ValidationError::MalformedHost(_))
        ));
    }

    #[tokio::test]
    async fn test_scan_loopback_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port().to_string();

        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("settings.json");
        std::fs::write(&config, r#"{"liveness_check": false}"#).unwrap();

        let args = cli(&[
            "-i",
            "127.0.0.1",
            "-r",
            &port,
            "-o",
            "json",
            "--config",
            config.to_str().unwrap(),
        ]);
        let report = assert_ok!(execute(&args).await);

        assert_eq!(report.open_ports.len(), 1);
        assert_eq!(report.open_ports[0].to_string(), port);
    }
}
