//! TCP connect prober.
//!
//! Determines port state by completing (or failing to complete) a full TCP
//! handshake through the operating system's socket API. No data is sent;
//! the stream is dropped as soon as the connection is established.

use super::cancel::CancellationToken;
use super::traits::{PortProber, PortResult, PortState};
use crate::error::{ProbeError, ProbeResult};
use crate::types::Port;
use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{trace, warn};

/// Default per-port connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// First wait before retrying a connect that ran out of descriptors.
const EXHAUSTED_BACKOFF: Duration = Duration::from_millis(10);
const EXHAUSTED_BACKOFF_MAX: Duration = Duration::from_millis(250);
const EXHAUSTED_RETRIES: u32 = 40;

/// TCP connect prober.
///
/// Does not require elevated privileges.
#[derive(Debug, Clone)]
pub struct TcpConnectProber {
    timeout: Duration,
}

impl TcpConnectProber {
    /// Create a prober with the given per-port connect timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Attempt to connect to the target address.
    async fn attempt_connect(&self, addr: SocketAddr) -> ProbeResult<TcpStream> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(classify(addr.port(), &e)),
            Err(_) => Err(ProbeError::Timeout),
        }
    }

    /// Connect, waiting out descriptor exhaustion instead of reporting it as
    /// a port state.
    async fn connect_with_backoff(
        &self,
        addr: SocketAddr,
        cancel: &CancellationToken,
    ) -> ProbeResult<TcpStream> {
        let mut backoff = EXHAUSTED_BACKOFF;
        let mut retries = 0;
        loop {
            match Box::pin(self.connect_with_backoff(addr, cancel)).await {
                Err(ProbeError::ResourceExhausted(reason)) if retries < EXHAUSTED_RETRIES => {
                    if cancel.is_cancelled() {
                        return Err(ProbeError::ResourceExhausted(reason));
                    }
                    trace!(%addr, %reason, ?backoff, "descriptors exhausted, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(EXHAUSTED_BACKOFF_MAX);
                    retries += 1;
                }
                other => return other,
            }
        }
    }
}

/// Map a connect error onto a probe error.
fn classify(port: u16, e: &io::Error) -> ProbeError {
    if is_descriptor_exhaustion(e) {
        return ProbeError::ResourceExhausted(e.to_string());
    }
    match e.kind() {
        ErrorKind::ConnectionRefused => ProbeError::ConnectionRefused,
        ErrorKind::HostUnreachable => ProbeError::HostUnreachable,
        ErrorKind::NetworkUnreachable => ProbeError::NetworkUnreachable(e.to_string()),
        _ => ProbeError::ConnectionFailed {
            port,
            reason: e.to_string(),
        },
    }
}

#[cfg(unix)]
fn is_descriptor_exhaustion(e: &io::Error) -> bool {
    matches!(e.raw_os_error(), Some(libc::EMFILE) | Some(libc::ENFILE))
}

#[cfg(not(unix))]
fn is_descriptor_exhaustion(_e: &io::Error) -> bool {
    false
}

impl Default for TcpConnectProber {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

#[async_trait]
impl PortProber for TcpConnectProber {
    async fn probe(&self, host: Ipv4Addr, port: Port, cancel: &CancellationToken) -> PortResult {
        if cancel.is_cancelled() {
            return PortResult::skipped(port);
        }

        let addr = SocketAddr::V4(SocketAddrV4::new(host, port.as_u16()));
        let start = Instant::now();

        match self.attempt_connect(addr).await {
            Ok(stream) => {
                let response_time = start.elapsed().as_millis() as u64;
                drop(stream);
                PortResult::new(port, PortState::Open).with_response_time(response_time)
            }
            Err(ProbeError::ResourceExhausted(reason)) => {
                if cancel.is_cancelled() {
                    return PortResult::skipped(port);
                }
                warn!(
                    %addr,
                    %reason,
                    "giving up on port, raise the open file limit or lower --concurrency"
                );
                PortResult::new(port, PortState::Filtered)
            }
            Err(e) => {
                trace!(%addr, error = %e, "probe failed");
                let state = match e {
                    ProbeError::ConnectionRefused => PortState::Closed,
                    _ => PortState::Filtered,
                };
                PortResult::new(port, state)
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
