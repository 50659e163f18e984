//! Internal diagnostics side-channel
//!
//! Sinks recover from some failures locally (a single file in a retention
//! sweep failing to delete) instead of surfacing them to callers. Those
//! recovered failures are reported here.

use std::error::Error;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

/// Side-channel for non-fatal internal failures
///
/// Nothing reported through this trait ever propagates to a sink's caller;
/// the operation that reported it continues.
pub trait InternalLog: Send + Sync {
    /// Report a recovered failure with its underlying error
    fn warn(&self, message: &str, error: &dyn Error);
}

/// Default implementation forwarding to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInternalLog;

impl InternalLog for TracingInternalLog {
    fn warn(&self, message: &str, error: &dyn Error) {
        warn!(error = %error, "{message}");
    }
}

/// One warning captured by a [`RecordingInternalLog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWarning {
    /// The reported message
    pub message: String,
    /// Display form of the underlying error
    pub error: String,
}

/// Capturing implementation for tests and simulations
///
/// Stores every reported warning in memory so assertions can inspect what a
/// sink recovered from.
#[derive(Debug, Default)]
pub struct RecordingInternalLog {
    warnings: Mutex<Vec<RecordedWarning>>,
}

impl RecordingInternalLog {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every warning recorded so far
    pub fn warnings(&self) -> Vec<RecordedWarning> {
        self.lock().clone()
    }

    /// Number of warnings recorded so far
    pub fn warning_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedWarning>> {
        self.warnings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InternalLog for RecordingInternalLog {
    fn warn(&self, message: &str, error: &dyn Error) {
        self.lock().push(RecordedWarning {
            message: message.to_string(),
            error: error.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that the InternalLog trait is object-safe
    fn _assert_object_safe(_: &dyn InternalLog) {}

    fn sample_error() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied")
    }

    #[test]
    fn test_recording_starts_empty() {
        let log = RecordingInternalLog::new();
        assert_eq!(log.warning_count(), 0);
        assert!(log.warnings().is_empty());
    }

    #[test]
    fn test_recording_captures_message_and_error() {
        let log = RecordingInternalLog::new();
        log.warn("Failed to delete 'log-20200101.txt'.", &sample_error());

        let warnings = log.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("log-20200101.txt"));
        assert_eq!(warnings[0].error, "access denied");
    }

    #[test]
    fn test_recording_keeps_call_order() {
        let log = RecordingInternalLog::new();
        log.warn("first", &sample_error());
        log.warn("second", &sample_error());

        let warnings = log.warnings();
        assert_eq!(warnings[0].message, "first");
        assert_eq!(warnings[1].message, "second");
    }

    #[test]
    fn test_tracing_impl_does_not_panic() {
        TracingInternalLog.warn("something recovered", &sample_error());
    }
}
