//! Call-site filtering
//!
//! Two orthogonal exclusions applied before sampling: a source-path prefix
//! restriction, and a predicate weeding out calls on synthetic scopes.

use crate::events::CallEvent;

/// Restricts tracing to call sites under a configured path prefix.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    prefix: Option<String>,
}

impl PathFilter {
    /// Filter that accepts every path.
    pub fn all() -> Self {
        Self { prefix: None }
    }

    /// Filter that only accepts paths starting with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Whether a call site at `path` may be traced.
    pub fn matches(&self, path: &str) -> bool {
        match &self.prefix {
            None => true,
            Some(prefix) => path.starts_with(prefix),
        }
    }
}

/// Predicate classifying calls whose defining scope is synthetic noise.
///
/// What exactly counts as a synthetic scope is host-runtime-specific, so
/// the rule is pluggable rather than fixed; [`SingletonScopeFilter`] is
/// the default.
pub trait ScopeFilter: Send + Sync {
    /// Returns `true` when the call should be excluded from tracing.
    fn is_synthetic(&self, event: &CallEvent<'_>) -> bool;
}

/// Default scope predicate: excludes calls on per-object singleton scopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingletonScopeFilter;

impl ScopeFilter for SingletonScopeFilter {
    fn is_synthetic(&self, event: &CallEvent<'_>) -> bool {
        event.singleton_scope
    }
}
