//! Log events and severity levels

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Process-wide counter assigning each event a unique sequence number
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Severity of a log event, from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// The level name as an uppercase static string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single structured log event
///
/// Events are stamped with a UTC timestamp and a process-wide sequence
/// number at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Process-wide sequence number
    pub sequence: u64,
    /// When the event was created
    pub timestamp: DateTime<Utc>,
    /// Severity level
    pub level: LogLevel,
    /// Name of the logger that produced the event
    pub source: String,
    /// The log message
    pub message: String,
    /// Optional error description attached to the event
    pub error: Option<String>,
}

impl LogEvent {
    /// Create an event stamped with the current time and the next sequence number
    pub fn new(level: LogLevel, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::SeqCst),
            timestamp: Utc::now(),
            level,
            source: source.into(),
            message: message.into(),
            error: None,
        }
    }

    /// Attach an error description to the event
    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
