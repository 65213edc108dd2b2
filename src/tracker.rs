//! Signature tracking orchestrator
//!
//! The single point of registration with the host's event source. Applies
//! the sampling policy and filters, keeps per-thread call/return
//! correlation, and forwards completed (call, return-type) pairs to the
//! introspection provider.
//!
//! Lifetime is explicit: [`SignatureTracker::start`] performs the provider
//! readiness check (fatal on failure), [`SignatureTracker::stop`] delivers
//! the teardown notification. Dropping an unstopped tracker sends the same
//! notification best-effort.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::events::{CallEvent, EventListener, ReturnEvent};
use crate::filter::{PathFilter, ScopeFilter, SingletonScopeFilter};
use crate::monitor::PerformanceMonitor;
use crate::provider::IntrospectionProvider;
use crate::sampler::SamplingPolicy;
use crate::stack::{StackEntry, ThreadStacks};

/// Orchestrates call-signature collection for one process.
///
/// Handlers run synchronously on the calling thread and never block,
/// panic, or propagate provider failures into the host program.
pub struct SignatureTracker {
    provider: Arc<dyn IntrospectionProvider>,
    sampler: SamplingPolicy,
    path_filter: PathFilter,
    scope_filter: Box<dyn ScopeFilter>,
    stacks: ThreadStacks,
    monitor: PerformanceMonitor,
    unbalanced_returns: AtomicU64,
    stopped: AtomicBool,
}

impl SignatureTracker {
    /// Start tracking with the given configuration and provider.
    ///
    /// Checks provider readiness before anything else; a failure here is a
    /// fatal startup condition and no event is ever handled. Embedders are
    /// expected to print the error and exit with a nonzero status.
    pub fn start(
        config: TrackerConfig,
        provider: Arc<dyn IntrospectionProvider>,
    ) -> Result<Self, TrackerError> {
        if let Err(err) = provider.check_readiness() {
            return Err(TrackerError::ProviderNotReady(err.to_string()));
        }

        let path_filter = match config.path_prefix {
            Some(prefix) => PathFilter::with_prefix(prefix),
            None => PathFilter::all(),
        };

        Ok(Self {
            sampler: SamplingPolicy::new(config.sample_every),
            path_filter,
            scope_filter: Box::new(SingletonScopeFilter),
            stacks: ThreadStacks::new(),
            monitor: PerformanceMonitor::new(config.debug),
            unbalanced_returns: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
            provider,
        })
    }

    /// Replace the synthetic-scope predicate.
    ///
    /// The default excludes per-object singleton scopes; host runtimes
    /// with different reflection capabilities can substitute their own
    /// rule.
    pub fn with_scope_filter(mut self, filter: impl ScopeFilter + 'static) -> Self {
        self.scope_filter = Box::new(filter);
        self
    }

    /// Handle a call event observed on the current thread.
    ///
    /// Every call pushes exactly one stack entry, traced or not, so the
    /// matching return always pops its own entry.
    pub fn handle_call(&self, event: &CallEvent<'_>) {
        if !self.should_record(event) {
            self.stacks.push_current(StackEntry::Untraced);
            return;
        }

        self.monitor.on_call_submitted();
        match self
            .provider
            .record_call(event.line, event.callee, event.source_path)
        {
            Ok(handle) => self.stacks.push_current(StackEntry::Traced(handle)),
            Err(err) => {
                tracing::debug!(callee = event.callee, %err, "dropping call record");
                self.stacks.push_current(StackEntry::Untraced);
            }
        }
    }

    /// Handle a return event observed on the current thread.
    pub fn handle_return(&self, event: &ReturnEvent<'_>) {
        self.monitor.on_return();

        let Some(entry) = self.stacks.pop_current() else {
            // Unreachable under correct host nesting; degrade, never
            // unwind into the host.
            self.unbalanced_returns.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                scope = event.defining_scope,
                "return event with no pending call on this thread"
            );
            return;
        };

        let StackEntry::Traced(handle) = entry else {
            return;
        };

        match self
            .provider
            .record_return(handle, event.defining_scope, event.return_type)
        {
            Ok(()) => self.monitor.on_handled_return(),
            Err(err) => {
                tracing::debug!(scope = event.defining_scope, %err, "dropping return record");
            }
        }
    }

    /// Notify the provider of teardown. Idempotent; also runs on drop.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.provider.teardown();
        }
    }

    /// Performance counters for embedding diagnostics.
    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    /// Distinct callees recorded by the sampling cache (rate N > 1 only).
    pub fn distinct_callees(&self) -> usize {
        self.sampler.seen_count()
    }

    /// Pending calls on the current thread's stack.
    pub fn current_depth(&self) -> usize {
        self.stacks.current_depth()
    }

    /// Return events observed with an empty stack since start.
    pub fn unbalanced_returns(&self) -> u64 {
        self.unbalanced_returns.load(Ordering::Relaxed)
    }

    // Filters run before the sampler so the first-occurrence cache only
    // learns callees that are actually eligible for tracing.
    fn should_record(&self, event: &CallEvent<'_>) -> bool {
        if event.defining_scope.is_none() {
            return false;
        }
        if self.scope_filter.is_synthetic(event) {
            return false;
        }
        if !self.path_filter.matches(event.source_path) {
            return false;
        }
        self.sampler.should_trace(event.callee)
    }
}

impl Drop for SignatureTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl EventListener for SignatureTracker {
    fn on_call(&self, event: &CallEvent<'_>) {
        self.handle_call(event);
    }

    fn on_return(&self, event: &ReturnEvent<'_>) {
        self.handle_return(event);
    }
}
