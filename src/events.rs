//! Call and return event data model
//!
//! Events are produced by the host's event source and borrowed for the
//! duration of the listener callback; nothing here outlives the call that
//! delivered it.

use serde::Serialize;

/// Notification that a traceable unit of code has begun executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallEvent<'a> {
    /// Source line of the call site
    pub line: u32,
    /// Callee identifier (method name)
    pub callee: &'a str,
    /// Source path of the call site
    pub source_path: &'a str,
    /// Identifier of the scope defining the callee; `None` for anonymous
    /// scopes
    pub defining_scope: Option<&'a str>,
    /// Whether the defining scope is a synthetic per-object scope
    pub singleton_scope: bool,
}

/// Notification that a traceable unit of code has finished executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReturnEvent<'a> {
    /// Identifier of the scope defining the returning callee
    pub defining_scope: &'a str,
    /// Runtime type identifier of the returned value
    pub return_type: &'a str,
}

/// Listener the host event source invokes synchronously.
///
/// Handlers run in-line on the calling thread, before that thread's own
/// call or return proceeds. They must be non-blocking and must not unwind:
/// a panic here corrupts the host program's control flow, not just the
/// instrumentation.
pub trait EventListener: Send + Sync {
    /// A call event was observed on the current thread.
    fn on_call(&self, event: &CallEvent<'_>);

    /// A return event was observed on the current thread.
    fn on_return(&self, event: &ReturnEvent<'_>);
}
