//! Scanner module - coordinates concurrent port probing.
//!
//! The [`Coordinator`] fans a port range out over a bounded pool of tokio
//! tasks, gathers confirmed-open ports into a shared collection and hands
//! back an immutable [`ScanReport`]. A [`CancellationToken`] stops new
//! probes from being scheduled; probes already in flight run to their own
//! timeout and are still counted.

pub mod cancel;
pub mod liveness;
pub mod tcp;
pub mod traits;

use crate::types::{Port, ScanTarget};
use chrono::{DateTime, Utc};
use futures::future;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

pub use cancel::CancellationToken;
pub use liveness::PingProber;
pub use tcp::TcpConnectProber;
pub use traits::{
    HostState, LivenessProber, NoopObserver, PortProber, PortResult, PortState, ScanObserver,
};

/// Default number of probes allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 500;

/// Upper bound on probes in flight; each one holds a socket descriptor.
pub const MAX_CONCURRENCY: usize = 4096;

/// How many ports may be pulled from the range ahead of a free permit.
const DISPATCH_AHEAD: usize = 1000;

/// Outcome of a scan, complete or cut short by cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: ScanTarget,
    /// Advisory only; ports are scanned regardless.
    pub host_state: HostState,
    /// Ascending, duplicate-free.
    pub open_ports: Vec<Port>,
    /// Probes that actually attempted a connection.
    pub ports_probed: usize,
    pub closed_ports: usize,
    pub filtered_ports: usize,
    /// Scheduled but dropped because cancellation was observed first.
    pub skipped_ports: usize,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ScanReport {
    /// Check whether the scan walked the whole range.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.ports_probed == self.target.ports().len()
    }
}

/// Per-state counters folded from completed tasks.
#[derive(Debug, Default)]
struct Tally {
    probed: usize,
    closed: usize,
    filtered: usize,
    skipped: usize,
}

impl Tally {
    fn record(mut self, joined: Result<PortResult, JoinError>) -> Self {
        match joined {
            Ok(result) => match result.state {
                PortState::Open => self.probed += 1,
                PortState::Closed => {
                    self.probed += 1;
                    self.closed += 1;
                }
                PortState::Filtered => {
                    self.probed += 1;
                    self.filtered += 1;
                }
                PortState::Skipped => self.skipped += 1,
            },
            Err(e) => {
                warn!(error = %e, "probe task failed");
                self.probed += 1;
                self.filtered += 1;
            }
        }
        self
    }
}

/// Drives a scan over one target.
pub struct Coordinator {
    prober: Arc<dyn PortProber>,
    liveness: Option<Arc<dyn LivenessProber>>,
    concurrency: usize,
    observer: Arc<dyn ScanObserver>,
}

impl Coordinator {
    /// Create a coordinator with no liveness check and the default bound.
    pub fn new(prober: impl PortProber + 'static) -> Self {
        Self {
            prober: Arc::new(prober),
            liveness: None,
            concurrency: DEFAULT_CONCURRENCY,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Run a liveness check before probing ports.
    pub fn with_liveness(mut self, liveness: impl LivenessProber + 'static) -> Self {
        self.liveness = Some(Arc::new(liveness));
        self
    }

    /// Bound the number of concurrent probes, clamped to `1..=MAX_CONCURRENCY`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        if self.concurrency != concurrency {
            warn!(
                requested = concurrency,
                using = self.concurrency,
                "concurrency out of range, clamping"
            );
        }
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Scan every port of `target` until done or cancelled.
    ///
    /// Never fails: unreachable hosts and failed probes simply contribute
    /// no open ports.
    pub async fn scan(&self, target: &ScanTarget, cancel: &CancellationToken) -> ScanReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let host = target.host();

        info!(
            %host,
            ports = %target.ports(),
            concurrency = self.concurrency,
            timeout_ms = self.prober.timeout().as_millis() as u64,
            "starting scan"
        );

        let host_state = self.check_liveness(host, cancel).await;

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let open_ports: Arc<Mutex<Vec<Port>>> = Arc::new(Mutex::new(Vec::new()));

        let gate = cancel.clone();
        let tally = stream::iter(target.ports().iter())
            // Stop pulling new ports once cancellation is requested.
            .take_while(move |_| future::ready(!gate.is_cancelled()))
            .map(|port| {
                let prober = Arc::clone(&self.prober);
                let observer = Arc::clone(&self.observer);
                let semaphore = Arc::clone(&semaphore);
                let open_ports = Arc::clone(&open_ports);
                let cancel = cancel.clone();

                tokio::spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return PortResult::skipped(port);
                    };

                    let result = prober.probe(host, port, &cancel).await;
                    if result.state == PortState::Skipped {
                        return result;
                    }

                    debug!(%port, state = %result.state, "probe complete");
                    if result.is_open() {
                        open_ports.lock().await.push(port);
                        observer.on_open(host, &result);
                    }
                    observer.on_probe_complete(&result);
                    result
                })
            })
            .buffer_unordered(DISPATCH_AHEAD.max(self.concurrency))
            .fold(Tally::default(), |tally, joined| {
                future::ready(tally.record(joined))
            })
            .await;

        let mut open_ports = std::mem::take(&mut *open_ports.lock().await);
        open_ports.sort_unstable();
        open_ports.dedup();

        let cancelled = cancel.is_cancelled();
        if cancelled {
            warn!(
                probed = tally.probed,
                skipped = tally.skipped,
                "scan cancelled, returning partial results"
            );
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            %host,
            open = open_ports.len(),
            probed = tally.probed,
            duration_ms,
            "scan finished"
        );

        ScanReport {
            target: *target,
            host_state,
            open_ports,
            ports_probed: tally.probed,
            closed_ports: tally.closed,
            filtered_ports: tally.filtered,
            skipped_ports: tally.skipped,
            cancelled,
            started_at,
            duration_ms,
        }
    }

    async fn check_liveness(&self, host: Ipv4Addr, cancel: &CancellationToken) -> HostState {
        let Some(liveness) = &self.liveness else {
            return HostState::Unknown;
        };
        if cancel.is_cancelled() {
            return HostState::Unknown;
        }

        let state = liveness.probe(host).await;
        match state {
            HostState::Alive => info!(%host, "host is alive"),
            _ => info!(%host, "no reply to liveness probe, scanning anyway"),
        }
        self.observer.on_liveness(host, state);
        state
    }
}
