//! Cooperative cancellation for a running scan.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// A one-way stop flag shared by the dispatch loop and every probe.
///
/// Cloning yields another handle to the same flag. The transition from
/// active to cancelled happens at most once and is never reverted.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    /// Lock-free check used before scheduling and before each connect.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Cancel this token on the first Ctrl-C.
    ///
    /// The listener task is detached; it lives until the interrupt arrives
    /// or the runtime shuts down.
    pub fn cancel_on_ctrl_c(&self) {
        let token = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() && token.cancel() {
                warn!("interrupt received, stopping the scan");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_active() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancellationToken::new();
        assert!(token.cancel());
        assert!(!token.cancel());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_visible_across_tasks() {
        let token = CancellationToken::new();
        let handle = {
            let token = token.clone();
            tokio::spawn(async move {
                while !token.is_cancelled() {
                    tokio::task::yield_now().await;
                }
            })
        };
        token.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
