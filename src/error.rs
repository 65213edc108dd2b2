//! Error taxonomy for the tracing core
//!
//! Only startup errors are fatal; everything after registration degrades
//! silently so the instrumentation never disturbs the host program.

use thiserror::Error;

/// Errors that abort tracker startup.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The introspection provider cannot trace this process. Embedders are
    /// expected to surface the message and exit with a nonzero status.
    #[error("introspection provider not ready: {0}")]
    ProviderNotReady(String),
}

/// Errors reported by an introspection provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Required runtime hooks are unavailable.
    #[error("runtime hooks unavailable: {0}")]
    NotReady(String),

    /// The provider could not record a call.
    #[error("failed to record call to `{callee}`: {reason}")]
    RecordCall { callee: String, reason: String },

    /// The provider could not resolve or record a return type.
    #[error("failed to record return for `{scope}`: {reason}")]
    RecordReturn { scope: String, reason: String },
}
