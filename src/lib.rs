//! # portprobe - A Concurrent TCP Port Scanner
//!
//! portprobe determines which TCP ports on an IPv4 host accept connections.
//! Probing runs on tokio with a bounded number of connections in flight,
//! and a scan can be stopped early through a cooperative cancellation
//! token while still producing a consistent partial report.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portprobe::scanner::{CancellationToken, Coordinator, PingProber, TcpConnectProber};
//! use portprobe::types::ScanTarget;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let target = ScanTarget::parse("192.168.1.10", 0, 1023).unwrap();
//!     let coordinator = Coordinator::new(TcpConnectProber::new(Duration::from_secs(1)))
//!         .with_liveness(PingProber::default())
//!         .with_concurrency(500);
//!
//!     let report = coordinator.scan(&target, &CancellationToken::new()).await;
//!     println!("open: {:?}", report.open_ports);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated targets, ports and port ranges
//! - [`scanner`] - Probers, cancellation and the scan coordinator
//! - [`config`] - Settings file loading
//! - [`cli`] - Command-line adapter
//! - [`output`] - Plain, JSON and CSV formatters
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ValidationError};
pub use scanner::{CancellationToken, Coordinator, HostState, PortResult, PortState, ScanReport};
pub use types::{Port, PortRange, ScanTarget};
