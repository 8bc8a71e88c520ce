//! Host liveness check via the system `ping` utility.
//!
//! Raw ICMP needs elevated privileges, so the check shells out to `ping`
//! the way most unprivileged tools do. The result is advisory: many hosts
//! drop echo requests while still accepting TCP connections.

use super::traits::{HostState, LivenessProber};
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Default reachability timeout.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(1);

/// Extra time allowed for spawning the `ping` process itself.
const SPAWN_GRACE: Duration = Duration::from_secs(1);

/// Sends a single echo request through the platform `ping` binary.
#[derive(Debug, Clone)]
pub struct PingProber {
    timeout: Duration,
}

impl PingProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command(&self, host: Ipv4Addr) -> Command {
        let mut cmd = Command::new("ping");
        if cfg!(windows) {
            cmd.arg("-n")
                .arg("1")
                .arg("-w")
                .arg(self.timeout.as_millis().max(1).to_string());
        } else {
            cmd.arg("-c")
                .arg("1")
                .arg("-W")
                .arg(self.timeout.as_secs().max(1).to_string());
        }
        cmd.arg(host.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new(DEFAULT_PING_TIMEOUT)
    }
}

#[async_trait]
impl LivenessProber for PingProber {
    async fn probe(&self, host: Ipv4Addr) -> HostState {
        let status = timeout(self.timeout + SPAWN_GRACE, self.command(host).status()).await;

        match status {
            Ok(Ok(status)) if status.success() => HostState::Alive,
            Ok(Ok(status)) => {
                debug!(%host, code = ?status.code(), "no echo reply");
                HostState::Unreachable
            }
            Ok(Err(e)) => {
                debug!(%host, error = %e, "could not run ping");
                HostState::Unreachable
            }
            Err(_) => {
                debug!(%host, "ping timed out");
                HostState::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        assert_eq!(PingProber::default().timeout, DEFAULT_PING_TIMEOUT);
    }

    #[tokio::test]
    async fn test_never_reports_unknown() {
        // Whether or not `ping` exists here, the answer must be definite.
        let state = PingProber::new(Duration::from_millis(200))
            .probe(Ipv4Addr::new(192, 0, 2, 1))
            .await;
        assert!(matches!(state, HostState::Alive | HostState::Unreachable));
    }
}
