//! Adaptive call sampling
//!
//! Decides, per call event, whether the invocation is traced in full or
//! skipped cheaply, trading completeness for overhead. Two modes, selected
//! by the configured rate N:
//!
//! - N == 0 or 1: trace every call (full fidelity, highest overhead)
//! - N > 1: trace a callee the first time it is ever seen, then with
//!   probability 1/N
//!
//! The first-occurrence cache guarantees that every distinct callee is
//! represented in the output at least once, while steady-state overhead on
//! hot, already-classified call sites drops by a factor of N.

use std::sync::{Mutex, PoisonError};

use fnv::FnvHashSet;
use rand::Rng;

/// Sampling decision policy shared by all host threads.
///
/// The callee cache grows monotonically and lives as long as the tracker;
/// insertions from concurrent threads are serialized by a lightweight
/// mutex.
#[derive(Debug)]
pub struct SamplingPolicy {
    every_n: u32,
    seen: Mutex<FnvHashSet<String>>,
}

impl SamplingPolicy {
    /// Policy for the configured rate N.
    pub fn new(every_n: u32) -> Self {
        Self {
            every_n,
            seen: Mutex::new(FnvHashSet::default()),
        }
    }

    /// Full-fidelity policy: every call is traced.
    pub fn every_call() -> Self {
        Self::new(1)
    }

    /// Configured rate N.
    pub fn rate(&self) -> u32 {
        self.every_n
    }

    /// Decide whether a call to `callee` should be traced.
    pub fn should_trace(&self, callee: &str) -> bool {
        if self.every_n <= 1 {
            return true;
        }
        if self.record_first_seen(callee) {
            return true;
        }
        rand::thread_rng().gen_range(0..self.every_n) == 0
    }

    /// Number of distinct callees traced at least once.
    ///
    /// Always zero in full-fidelity mode, which never consults the cache.
    pub fn seen_count(&self) -> usize {
        self.lock_seen().len()
    }

    // Returns true exactly once per distinct callee.
    fn record_first_seen(&self, callee: &str) -> bool {
        let mut seen = self.lock_seen();
        if seen.contains(callee) {
            false
        } else {
            seen.insert(callee.to_string());
            true
        }
    }

    fn lock_seen(&self) -> std::sync::MutexGuard<'_, FnvHashSet<String>> {
        // A poisoned cache still holds valid entries; sampling must never
        // panic into the host.
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
