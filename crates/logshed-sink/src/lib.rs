//! # logshed-sink
//!
//! Persistent file-backed sink for structured log events.
//!
//! A [`StreamingFileSink`] appends rendered events to per-day files inside
//! a managed directory, resolved lazily on first use over any
//! [`StorageFolder`](logshed_storage::StorageFolder) backend. Retention
//! sweeps purge expired files best effort, and exports bundle the current
//! file set into an in-memory zip archive.
//!
//! ## Features
//!
//! - Lazy, idempotent directory initialization; failures are not cached
//! - Append-only writes with platform line terminators
//! - Retention sweeps gated on pattern, date token and creation timestamp
//! - In-memory zip export of every current file
//!
//! ## Example
//!
//! ```rust,ignore
//! use chrono::Duration;
//! use logshed_core::{LogEvent, LogLevel};
//! use logshed_sink::{RetentionRule, StreamingFileSink};
//! use logshed_storage::FsFolder;
//!
//! let sink = StreamingFileSink::new(FsFolder::new("/var/lib/app"));
//!
//! // Append one event to today's file
//! sink.write_event(LogEvent::new(LogLevel::Info, "app", "started")).await?;
//!
//! // Purge files older than a week, then export the rest
//! let rule = RetentionRule::older_than(sink.naming().pattern(), Duration::days(7));
//! sink.cleanup(&rule).await?;
//! let archive = sink.export_compressed().await?;
//! ```

pub mod error;
pub mod naming;
pub mod retention;
pub mod streaming;

pub use error::SinkError;
pub use naming::FileNaming;
pub use retention::{DATE_TOKEN_LEN, RetentionRule, has_date_token};
pub use streaming::{LINE_ENDING, SinkConfig, StreamingFileSink, WriteResult};
