//! Error types for portprobe.
//!
//! Uses `thiserror` for ergonomic error definitions. Only validation and
//! configuration failures ever reach the caller; probe failures are folded
//! into a non-open `PortState` inside the scanner.

use std::path::PathBuf;
use thiserror::Error;

/// Errors detected before any network activity takes place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed host '{0}': expected a full dotted-decimal IPv4 address (e.g. 192.168.1.10)")]
    MalformedHost(String),

    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),

    #[error("invalid port number: {0}")]
    InvalidPort(String),

    #[error("no port range selected")]
    MissingRange,
}

/// Why a single connect attempt did not produce an open port.
///
/// Never surfaced to the user; the TCP prober maps it onto a `PortState`.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("connection timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("host unreachable")]
    HostUnreachable,

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("connection to port {port} failed: {reason}")]
    ConnectionFailed { port: u16, reason: String },

    #[error("out of socket descriptors: {0}")]
    ResourceExhausted(String),
}

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {}: {reason}", .path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),

    #[error("unknown output format '{0}'")]
    UnknownOutputFormat(String),
}

/// Top-level error for the command-line adapter.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
pub type ProbeResult<T> = Result<T, ProbeError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::MalformedHost("localhost".into());
        assert!(err.to_string().contains("localhost"));
        assert_eq!(
            ValidationError::InvalidRange(10, 5).to_string(),
            "invalid port range: start (10) > end (5)"
        );
    }

    #[test]
    fn test_config_messages() {
        assert_eq!(
            ConfigError::UnknownOutputFormat("xml".into()).to_string(),
            "unknown output format 'xml'"
        );
        let err = ConfigError::ReadFailed {
            path: PathBuf::from("/tmp/absent.json"),
            reason: "not found".into(),
        };
        assert!(err.to_string().contains("/tmp/absent.json"));
    }

    #[test]
    fn test_cli_error_from_validation() {
        let err: CliError = ValidationError::MissingRange.into();
        assert!(matches!(err, CliError::Validation(ValidationError::MissingRange)));
    }
}
