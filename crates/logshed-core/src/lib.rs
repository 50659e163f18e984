//! # Logshed Core
//!
//! Core types and collaborator traits for logshed sinks.
//!
//! This crate defines the domain model shared by every sink: the structured
//! [`LogEvent`], the [`Layout`] seam that renders an event as a text line,
//! and the [`InternalLog`] side-channel a sink uses to report non-fatal
//! internal failures without surfacing them to callers.
//!
//! ## Features
//!
//! - **LogEvent / LogLevel**: structured events with process-wide sequencing
//! - **Layout trait + SingleLineLayout**: pluggable line rendering
//! - **InternalLog trait**: diagnostics side-channel with a tracing-backed
//!   default and a recording implementation for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use logshed_core::{Layout, LogEvent, LogLevel, SingleLineLayout};
//!
//! let event = LogEvent::new(LogLevel::Info, "app", "started");
//! let line = SingleLineLayout.format(&event);
//! assert!(line.contains("INFO"));
//! ```

pub mod diagnostics;
pub mod event;
pub mod layout;

// Re-exports
pub use diagnostics::{InternalLog, RecordedWarning, RecordingInternalLog, TracingInternalLog};
pub use event::{LogEvent, LogLevel};
pub use layout::{Layout, SingleLineLayout};
