//! Introspection provider contract
//!
//! The provider is the opaque component that taps the host runtime's
//! execution events and extracts type and class names. This crate never
//! looks inside it: readiness is checked once at startup, call and return
//! records are handed over as they complete, and a best-effort teardown
//! notification is sent when tracking stops.

use crate::error::ProviderError;

/// Opaque token for a call that is being traced.
///
/// Issued by [`IntrospectionProvider::record_call`] and consumed exactly
/// once by [`IntrospectionProvider::record_return`], on the same thread
/// that obtained it. Deliberately not `Clone` or `Copy`.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SignatureHandle(u64);

impl SignatureHandle {
    /// Wrap a provider-chosen raw token.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Unwrap the raw token, consuming the handle.
    pub fn into_raw(self) -> u64 {
        self.0
    }
}

/// External component that records completed call signatures.
///
/// All methods may be called from any host thread; implementations must be
/// internally synchronized. [`record_return`] is always invoked on the
/// thread that obtained the handle.
///
/// [`record_return`]: IntrospectionProvider::record_return
pub trait IntrospectionProvider: Send + Sync {
    /// Verify the provider can trace this process.
    ///
    /// Called once, before any event handling. An error here is a fatal
    /// startup condition.
    fn check_readiness(&self) -> Result<(), ProviderError>;

    /// Record a traced call and return a handle for its eventual return.
    fn record_call(
        &self,
        line: u32,
        callee: &str,
        path: &str,
    ) -> Result<SignatureHandle, ProviderError>;

    /// Complete a traced call with its defining scope and return type.
    fn record_return(
        &self,
        handle: SignatureHandle,
        defining_scope: &str,
        return_type: &str,
    ) -> Result<(), ProviderError>;

    /// Best-effort shutdown notification; not guaranteed to run on abrupt
    /// process termination.
    fn teardown(&self);
}

/// Provider that discards every record.
///
/// Useful for embedding dry runs and for measuring the interception
/// overhead in isolation.
#[derive(Debug, Default)]
pub struct NoopProvider;

impl IntrospectionProvider for NoopProvider {
    fn check_readiness(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn record_call(
        &self,
        _line: u32,
        _callee: &str,
        _path: &str,
    ) -> Result<SignatureHandle, ProviderError> {
        Ok(SignatureHandle::from_raw(0))
    }

    fn record_return(
        &self,
        _handle: SignatureHandle,
        _defining_scope: &str,
        _return_type: &str,
    ) -> Result<(), ProviderError> {
        Ok(())
    }

    fn teardown(&self) {}
}
