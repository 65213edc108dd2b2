// Shared test utilities: an introspection provider that records everything
// it is handed, plus helpers for driving synthetic call/return sequences.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use firma::error::ProviderError;
use firma::events::{CallEvent, ReturnEvent};
use firma::provider::{IntrospectionProvider, SignatureHandle};
use firma::tracker::SignatureTracker;

/// One call handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub handle: u64,
    pub line: u32,
    pub callee: String,
    pub path: String,
}

/// One completed return handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedReturn {
    pub handle: u64,
    pub scope: String,
    pub return_type: String,
}

/// Provider double that keeps every record and hands out sequential
/// handles.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    ready_error: Option<String>,
    next_handle: AtomicU64,
    calls: Mutex<Vec<RecordedCall>>,
    returns: Mutex<Vec<RecordedReturn>>,
    teardowns: AtomicU64,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose readiness check fails with `message`.
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self {
            ready_error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn returns(&self) -> Vec<RecordedReturn> {
        self.returns.lock().unwrap().clone()
    }

    pub fn teardown_count(&self) -> u64 {
        self.teardowns.load(Ordering::Relaxed)
    }
}

impl IntrospectionProvider for RecordingProvider {
    fn check_readiness(&self) -> Result<(), ProviderError> {
        match &self.ready_error {
            Some(message) => Err(ProviderError::NotReady(message.clone())),
            None => Ok(()),
        }
    }

    fn record_call(
        &self,
        line: u32,
        callee: &str,
        path: &str,
    ) -> Result<SignatureHandle, ProviderError> {
        let raw = self.next_handle.fetch_add(1, Ordering::Relaxed) + 1;
        self.calls.lock().unwrap().push(RecordedCall {
            handle: raw,
            line,
            callee: callee.to_string(),
            path: path.to_string(),
        });
        Ok(SignatureHandle::from_raw(raw))
    }

    fn record_return(
        &self,
        handle: SignatureHandle,
        defining_scope: &str,
        return_type: &str,
    ) -> Result<(), ProviderError> {
        self.returns.lock().unwrap().push(RecordedReturn {
            handle: handle.into_raw(),
            scope: defining_scope.to_string(),
            return_type: return_type.to_string(),
        });
        Ok(())
    }

    fn teardown(&self) {
        self.teardowns.fetch_add(1, Ordering::Relaxed);
    }
}

/// Drive one call/return pair through the tracker.
///
/// The return type is derived from the callee name so correlation can be
/// checked on the recorded output.
pub fn drive_pair(tracker: &SignatureTracker, callee: &str, path: &str, scope: &str) {
    tracker.handle_call(&CallEvent {
        line: 1,
        callee,
        source_path: path,
        defining_scope: Some(scope),
        singleton_scope: false,
    });
    let return_type = return_type_for(callee);
    tracker.handle_return(&ReturnEvent {
        defining_scope: scope,
        return_type: &return_type,
    });
}

/// Deterministic return type for a callee, used to verify correlation.
pub fn return_type_for(callee: &str) -> String {
    format!("ReturnOf{}", callee)
}
