//! Prober and observer trait abstractions.
//!
//! The coordinator only talks to these traits, so the TCP and ping probers
//! can be swapped for in-memory fakes in tests.

use super::cancel::CancellationToken;
use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Outcome of probing a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// Handshake completed within the timeout.
    Open,
    /// Connection actively refused (RST received).
    Closed,
    /// Timed out or failed with some other transport error.
    Filtered,
    /// Cancellation was observed before the connect attempt started.
    Skipped,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of probing a single port. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortResult {
    pub port: Port,
    pub state: PortState,
    /// Connect latency, only recorded for open ports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl PortResult {
    pub fn new(port: Port, state: PortState) -> Self {
        Self {
            port,
            state,
            response_time_ms: None,
        }
    }

    /// Shorthand for a probe that never ran.
    pub fn skipped(port: Port) -> Self {
        Self::new(port, PortState::Skipped)
    }

    /// Set the response time.
    pub fn with_response_time(mut self, time_ms: u64) -> Self {
        self.response_time_ms = Some(time_ms);
        self
    }

    pub fn is_open(&self) -> bool {
        self.state == PortState::Open
    }
}

/// Reachability of the target host, independent of any port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HostState {
    Alive,
    Unreachable,
    /// No liveness probe ran.
    #[default]
    Unknown,
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alive => write!(f, "alive"),
            Self::Unreachable => write!(f, "unreachable"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Probes one (host, port) pair.
///
/// Implementations must never fail: every error path resolves to a
/// non-open `PortResult`.
#[async_trait]
pub trait PortProber: Send + Sync {
    /// Probe a single port. Returns `Skipped` without touching the network
    /// when `cancel` is already set.
    async fn probe(&self, host: Ipv4Addr, port: Port, cancel: &CancellationToken) -> PortResult;

    /// Upper bound on how long a single probe may block.
    fn timeout(&self) -> Duration;
}

/// Issues a single reachability check against a host.
#[async_trait]
pub trait LivenessProber: Send + Sync {
    /// Returns `Alive` or `Unreachable`; failures of the check itself are
    /// reported as `Unreachable`.
    async fn probe(&self, host: Ipv4Addr) -> HostState;
}

/// Receives scan progress as it happens.
///
/// Hooks are called from worker tasks concurrently and must not block.
pub trait ScanObserver: Send + Sync {
    fn on_liveness(&self, _host: Ipv4Addr, _state: HostState) {}

    /// Called once per confirmed open port, in completion order.
    fn on_open(&self, _host: Ipv4Addr, _result: &PortResult) {}

    /// Called for every probe that actually ran, open or not.
    fn on_probe_complete(&self, _result: &PortResult) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_state_display() {
        assert_eq!(PortState::Open.to_string(), "open");
        assert_eq!(PortState::Closed.to_string(), "closed");
        assert_eq!(PortState::Filtered.to_string(), "filtered");
        assert_eq!(PortState::Skipped.to_string(), "skipped");
    }

    #[test]
    fn test_port_result() {
        let result = PortResult::new(Port::new(80), PortState::Open).with_response_time(15);
        assert!(result.is_open());
        assert_eq!(result.response_time_ms, Some(15));

        let skipped = PortResult::skipped(Port::new(81));
        assert!(!skipped.is_open());
        assert_eq!(skipped.response_time_ms, None);
    }

    #[test]
    fn test_port_result_serialization() {
        let result = PortResult::new(Port::new(22), PortState::Filtered);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"port":22,"state":"filtered"}"#);
    }

    #[test]
    fn test_host_state_default() {
        assert_eq!(HostState::default(), HostState::Unknown);
        assert_eq!(HostState::Unreachable.to_string(), "unreachable");
    }
}
