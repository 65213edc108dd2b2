//! Per-thread pending-signature stacks
//!
//! Correlates each return event with its originating call on the same
//! thread, independent of other threads' interleavings and regardless of
//! whether the call was traced. Within one thread the host delivers
//! call/return events strictly nested and in program order, so a plain
//! LIFO stack mirrors the nesting exactly: one push per call, one pop per
//! return.
//!
//! Untraced calls still push a placeholder. Skipping the push would
//! desynchronize every later pop on that thread.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::provider::SignatureHandle;

/// One pending call on a thread's stack.
#[derive(Debug)]
pub enum StackEntry {
    /// Call skipped by sampling or filters; placeholder keeps pops paired
    Untraced,
    /// Call being traced; the handle is consumed by the matching return
    Traced(SignatureHandle),
}

impl StackEntry {
    /// Whether this entry carries a signature handle.
    pub fn is_traced(&self) -> bool {
        matches!(self, StackEntry::Traced(_))
    }
}

/// Thread-identity-keyed stacks, owned by the orchestrator.
///
/// Each stack is only ever pushed or popped by its owning thread; the
/// registry lock is held just long enough for the operation itself, so the
/// depth of a stack always equals the net (calls − returns) observed on
/// that thread since tracker start.
#[derive(Debug, Default)]
pub struct ThreadStacks {
    stacks: Mutex<HashMap<ThreadId, Vec<StackEntry>>>,
}

impl ThreadStacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an entry onto the calling thread's stack.
    pub fn push_current(&self, entry: StackEntry) {
        let id = thread::current().id();
        self.lock().entry(id).or_default().push(entry);
    }

    /// Pop the calling thread's most recent entry.
    ///
    /// `None` means a return was observed with no pending call on this
    /// thread, which is impossible under correct host nesting.
    pub fn pop_current(&self) -> Option<StackEntry> {
        let id = thread::current().id();
        self.lock().get_mut(&id).and_then(Vec::pop)
    }

    /// Depth of the calling thread's stack.
    pub fn current_depth(&self) -> usize {
        let id = thread::current().id();
        self.lock().get(&id).map_or(0, Vec::len)
    }

    /// Number of threads that have pushed at least one entry.
    pub fn thread_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ThreadId, Vec<StackEntry>>> {
        // A poisoned registry still holds valid stacks; correlation must
        // never panic into the host.
        self.stacks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
