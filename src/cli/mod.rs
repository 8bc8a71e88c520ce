//! Command-line interface definitions for portprobe.
//!
//! Uses `clap` derive macros for declarative argument parsing. Exactly one
//! range selector must be given; clap rejects anything else with a usage
//! error before a scan is attempted.

pub mod scan;

use crate::error::{ConfigError, ConfigResult, ValidationError, ValidationResult};
use crate::types::PortRange;
use clap::{ArgGroup, Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// A concurrent TCP connect port scanner.
#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan an IPv4 host for open TCP ports", long_about = None)]
#[command(group(
    ArgGroup::new("port_range")
        .required(true)
        .args(["well_known", "registered", "private", "all", "range"])
))]
pub struct Cli {
    /// Target IPv4 address (e.g., 192.168.1.10)
    #[arg(short = 'i', long = "ip", value_name = "HOST")]
    pub host: String,

    /// Scan well-known ports (0-1023)
    #[arg(short = 's', long)]
    pub well_known: bool,

    /// Scan registered ports (1024-49151)
    #[arg(short = 'u', long)]
    pub registered: bool,

    /// Scan dynamic/private ports (49152-65535)
    #[arg(short = 'p', long)]
    pub private: bool,

    /// Scan all ports (0-65535)
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Scan a custom range (e.g., "8000-8100" or "22")
    #[arg(short = 'r', long, value_name = "START-END")]
    pub range: Option<PortRange>,

    /// Maximum number of concurrent probes
    #[arg(short = 'c', long, env = "PORTPROBE_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Connection timeout per port in milliseconds
    #[arg(short = 't', long = "timeout", value_name = "MS", env = "PORTPROBE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Skip the host liveness check
    #[arg(long)]
    pub no_ping: bool,

    /// Verbose output (progress bar and info logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolve the selected range preset.
    pub fn port_range(&self) -> ValidationResult<PortRange> {
        if self.well_known {
            Ok(PortRange::well_known())
        } else if self.registered {
            Ok(PortRange::registered())
        } else if self.private {
            Ok(PortRange::dynamic())
        } else if self.all {
            Ok(PortRange::all())
        } else {
            self.range.ok_or(ValidationError::MissingRange)
        }
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl OutputFormat {
    /// Parse a format name from the settings file.
    pub fn from_setting(name: &str) -> ConfigResult<Self> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| ConfigError::UnknownOutputFormat(name.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("portprobe").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_presets() {
        let cli = parse(&["-i", "10.0.0.1", "-s"]).unwrap();
        assert_eq!(cli.port_range().unwrap(), PortRange::well_known());

        let cli = parse(&["-i", "10.0.0.1", "-u"]).unwrap();
        assert_eq!(cli.port_range().unwrap(), PortRange::registered());

        let cli = parse(&["-i", "10.0.0.1", "-p"]).unwrap();
        assert_eq!(cli.port_range().unwrap(), PortRange::dynamic());

        let cli = parse(&["-i", "10.0.0.1", "-a"]).unwrap();
        assert_eq!(cli.port_range().unwrap(), PortRange::all());
    }

    #[test]
    fn test_custom_range() {
        let cli = parse(&["-i", "10.0.0.1", "-r", "6000-6010"]).unwrap();
        assert_eq!(cli.port_range().unwrap(), PortRange::new(6000, 6010).unwrap());
    }

    #[test]
    fn test_missing_range_is_usage_error() {
        let err = parse(&["-i", "10.0.0.1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_two_ranges_conflict() {
        let err = parse(&["-i", "10.0.0.1", "-s", "-a"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_invalid_custom_range() {
        assert!(parse(&["-i", "10.0.0.1", "-r", "90-10"]).is_err());
    }

    #[test]
    fn test_output_format_from_setting() {
        assert_eq!(OutputFormat::from_setting("JSON").unwrap(), OutputFormat::Json);
        assert!(matches!(
            OutputFormat::from_setting("xml"),
            Err(ConfigError::UnknownOutputFormat(_))
        ));
    }
}
