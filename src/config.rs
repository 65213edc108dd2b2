//! Tracker configuration
//!
//! Configuration is read once at startup from the environment; embedders
//! and tests can also build a [`TrackerConfig`] programmatically.

use std::env;

/// Sampling rate N: trace every call when 0/1, otherwise each distinct
/// callee at least once plus a 1/N draw.
pub const SAMPLE_EVERY_VAR: &str = "FIRMA_SAMPLE_EVERY";

/// Restrict tracing to call sites whose source path starts with this
/// prefix.
pub const PATH_PREFIX_VAR: &str = "FIRMA_PATH_PREFIX";

/// Enable periodic performance-monitor reporting.
pub const DEBUG_VAR: &str = "FIRMA_DEBUG";

/// Startup configuration for a [`SignatureTracker`].
///
/// [`SignatureTracker`]: crate::tracker::SignatureTracker
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Sampling rate N; 0 and 1 both mean full fidelity
    pub sample_every: u32,
    /// Source-path prefix filter; `None` means no restriction
    pub path_prefix: Option<String>,
    /// Enable periodic throughput reporting
    pub debug: bool,
}

impl TrackerConfig {
    /// Full-fidelity configuration with no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from `FIRMA_*` environment variables.
    ///
    /// An unset or unparsable sampling rate falls back to full fidelity;
    /// an empty prefix is treated as unset. The debug flag is enabled by
    /// presence alone.
    pub fn from_env() -> Self {
        let sample_every = env::var(SAMPLE_EVERY_VAR)
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0);
        let path_prefix = env::var(PATH_PREFIX_VAR).ok().filter(|p| !p.is_empty());
        let debug = env::var(DEBUG_VAR).is_ok();

        Self {
            sample_every,
            path_prefix,
            debug,
        }
    }

    /// Set the sampling rate N.
    pub fn with_sample_every(mut self, sample_every: u32) -> Self {
        self.sample_every = sample_every;
        self
    }

    /// Set the source-path prefix filter.
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    /// Enable or disable periodic reporting.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
