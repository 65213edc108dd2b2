//! Performance accounting
//!
//! Purely observational: counters never gate tracing decisions. Counts are
//! best-effort under concurrency (relaxed atomics), but the structures
//! themselves are never corrupted by interleaved updates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Total calls between periodic snapshots.
pub const REPORT_INTERVAL: u64 = 100_000;

/// Install a stderr `tracing` subscriber for diagnostic output.
///
/// Embedders with their own subscriber should skip this. Installing twice
/// is harmless; the second attempt is ignored.
pub fn init_diagnostics() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Periodic throughput snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Returns observed since tracker start
    pub total_calls: u64,
    /// Call/return pairs recorded successfully
    pub handled_calls: u64,
    /// Calls elected for tracing
    pub submitted_calls: u64,
    /// Handled calls since the previous snapshot
    pub handled_delta: u64,
    /// Wall-clock time since the previous snapshot
    pub elapsed: Duration,
}

/// Counts submitted, handled, and total calls; reports throughput every
/// [`REPORT_INTERVAL`] calls when reporting is enabled.
#[derive(Debug)]
pub struct PerformanceMonitor {
    reporting: bool,
    total_calls: AtomicU64,
    submitted_calls: AtomicU64,
    handled_calls: AtomicU64,
    last_handled: AtomicU64,
    last_report: Mutex<Instant>,
}

impl PerformanceMonitor {
    /// Monitor with snapshot emission enabled or disabled. Counting always
    /// happens either way.
    pub fn new(reporting: bool) -> Self {
        Self {
            reporting,
            total_calls: AtomicU64::new(0),
            submitted_calls: AtomicU64::new(0),
            handled_calls: AtomicU64::new(0),
            last_handled: AtomicU64::new(0),
            last_report: Mutex::new(Instant::now()),
        }
    }

    /// A call was elected for tracing.
    pub fn on_call_submitted(&self) {
        self.submitted_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// A traced call's return was recorded successfully.
    pub fn on_handled_return(&self) {
        self.handled_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// A return was observed. Produces a snapshot every
    /// [`REPORT_INTERVAL`] calls, emitting it via `tracing` when reporting
    /// is enabled.
    pub fn on_return(&self) -> Option<Snapshot> {
        let total = self.total_calls.fetch_add(1, Ordering::Relaxed) + 1;
        if total % REPORT_INTERVAL != 0 {
            return None;
        }

        let snapshot = self.take_snapshot(total);
        if self.reporting {
            tracing::info!(
                total_calls = snapshot.total_calls,
                handled_calls = snapshot.handled_calls,
                submitted_calls = snapshot.submitted_calls,
                handled_delta = snapshot.handled_delta,
                elapsed_ms = snapshot.elapsed.as_millis() as u64,
                "signature tracing throughput"
            );
        }
        Some(snapshot)
    }

    /// Returns observed so far.
    pub fn total_calls(&self) -> u64 {
        self.total_calls.load(Ordering::Relaxed)
    }

    /// Calls elected for tracing so far.
    pub fn submitted_calls(&self) -> u64 {
        self.submitted_calls.load(Ordering::Relaxed)
    }

    /// Call/return pairs recorded so far.
    pub fn handled_calls(&self) -> u64 {
        self.handled_calls.load(Ordering::Relaxed)
    }

    fn take_snapshot(&self, total: u64) -> Snapshot {
        let handled = self.handled_calls.load(Ordering::Relaxed);
        // Snapshots from racing threads may interleave; the delta is
        // best-effort telemetry and must not underflow.
        let previous = self.last_handled.swap(handled, Ordering::Relaxed);
        let handled_delta = handled.saturating_sub(previous);

        let now = Instant::now();
        let mut last = self
            .last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let elapsed = now.duration_since(*last);
        *last = now;

        Snapshot {
            total_calls: total,
            handled_calls: handled,
            submitted_calls: self.submitted_calls.load(Ordering::Relaxed),
            handled_delta,
            elapsed,
        }
    }
}
