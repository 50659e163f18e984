//! Streaming file sink
//!
//! Appends rendered log events to per-day files inside a managed directory
//! that is resolved lazily on first use and reused for the life of the
//! sink. Retention sweeps delete expired files best effort, reporting
//! failed deletes through the diagnostic channel. Exports bundle every
//! current file into an in-memory zip archive.

use std::io::{Cursor, Write as _};
use std::sync::Arc;

use logshed_core::{InternalLog, Layout, LogEvent, SingleLineLayout, TracingInternalLog};
use logshed_storage::{StorageFile, StorageFolder};
use tokio::sync::OnceCell;
use tracing::{debug, instrument, trace};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::SinkError;
use crate::naming::FileNaming;
use crate::retention::{RetentionRule, has_date_token};

/// Platform line terminator appended after every rendered event
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Configuration for a [`StreamingFileSink`]
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Name the sink reports in write results
    pub name: String,
    /// Directory opened or created under the storage root
    pub dir_name: String,
    /// How per-day event files are named
    pub naming: FileNaming,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            name: "streaming-file".to_string(),
            dir_name: "logs".to_string(),
            naming: FileNaming::default(),
        }
    }
}

impl SinkConfig {
    /// Set the name the sink reports in write results
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the directory opened under the storage root
    pub fn with_dir_name(mut self, dir_name: impl Into<String>) -> Self {
        self.dir_name = dir_name.into();
        self
    }

    /// Set the naming scheme for per-day event files
    pub fn with_naming(mut self, naming: FileNaming) -> Self {
        self.naming = naming;
        self
    }
}

/// Outcome of a completed append, carrying the originating event
///
/// Returned so an upstream batching layer can track which events have been
/// durably handled. Failed appends never produce a result; they surface as
/// [`SinkError`].
#[derive(Debug, Clone)]
pub struct WriteResult {
    sink: Arc<str>,
    event: LogEvent,
    success: bool,
}

impl WriteResult {
    fn success(sink: Arc<str>, event: LogEvent) -> Self {
        Self {
            sink,
            event,
            success: true,
        }
    }

    /// Name of the sink that handled the event
    pub fn sink(&self) -> &str {
        &self.sink
    }

    /// Whether the append completed
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The event that was written
    pub fn event(&self) -> &LogEvent {
        &self.event
    }

    /// Take the event back out of the result
    pub fn into_event(self) -> LogEvent {
        self.event
    }
}

/// File-backed sink writing rendered events into a managed directory
///
/// The directory is opened or created on the first operation that needs it
/// and the handle is reused afterwards; a failed initialization is not
/// cached, so a later call may retry. One sink instance may be shared
/// across tasks; concurrent operations coalesce on the single
/// initialization and otherwise rely on the storage backend's per-call
/// atomicity.
pub struct StreamingFileSink<F: StorageFolder> {
    name: Arc<str>,
    root: F,
    config: SinkConfig,
    layout: Box<dyn Layout>,
    internal: Arc<dyn InternalLog>,
    folder: OnceCell<F>,
}

impl<F: StorageFolder> StreamingFileSink<F> {
    /// Sink with default configuration, writing under `root`
    pub fn new(root: F) -> Self {
        Self::with_config(root, SinkConfig::default())
    }

    /// Sink with the given configuration, writing under `root`
    pub fn with_config(root: F, config: SinkConfig) -> Self {
        Self {
            name: Arc::from(config.name.as_str()),
            root,
            config,
            layout: Box::new(SingleLineLayout),
            internal: Arc::new(TracingInternalLog),
            folder: OnceCell::new(),
        }
    }

    /// Replace the layout used by [`write_event`](Self::write_event)
    pub fn with_layout(mut self, layout: impl Layout + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    /// Replace the diagnostic channel that receives cleanup warnings
    pub fn with_internal_log(mut self, internal: Arc<dyn InternalLog>) -> Self {
        self.internal = internal;
        self
    }

    /// Name the sink reports in write results
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sink's configuration
    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// The naming scheme for per-day event files
    pub fn naming(&self) -> &FileNaming {
        &self.config.naming
    }

    /// Resolve the managed directory if it has not been resolved yet
    ///
    /// Idempotent; once a handle is held, later calls return without
    /// touching storage. Called implicitly by every operation, so the
    /// first external call on a fresh sink may be a write, a cleanup or an
    /// export.
    pub async fn ensure_initialized(&self) -> Result<(), SinkError> {
        self.folder().await.map(|_| ())
    }

    async fn folder(&self) -> Result<&F, SinkError> {
        self.folder
            .get_or_try_init(|| async {
                let folder = self
                    .root
                    .open_or_create_folder(&self.config.dir_name)
                    .await
                    .map_err(|e| SinkError::initialize(self.config.dir_name.as_str(), e))?;
                debug!(dir = %self.config.dir_name, "Initialized log directory");
                Ok(folder)
            })
            .await
    }

    /// Append `contents` and a line terminator to the named file
    ///
    /// The file is opened or created inside the managed directory, so
    /// repeated writes to the same name accumulate across the sink's
    /// lifetime. The returned result carries `event` back to the caller.
    /// Failures propagate; nothing is retried.
    pub async fn write(
        &self,
        file_name: &str,
        contents: &str,
        event: LogEvent,
    ) -> Result<WriteResult, SinkError> {
        let folder = self.folder().await?;
        let file = folder
            .open_or_create_file(file_name)
            .await
            .map_err(|e| SinkError::write(file_name, e))?;

        let mut line = String::with_capacity(contents.len() + LINE_ENDING.len());
        line.push_str(contents);
        line.push_str(LINE_ENDING);
        file.append_text(&line)
            .await
            .map_err(|e| SinkError::write(file_name, e))?;

        trace!(file = %file_name, sequence = event.sequence, "Appended event");
        Ok(WriteResult::success(Arc::clone(&self.name), event))
    }

    /// Render `event` through the layout and append it to the file named
    /// after the event's own date
    pub async fn write_event(&self, event: LogEvent) -> Result<WriteResult, SinkError> {
        let file_name = self.config.naming.file_name(event.timestamp);
        let contents = self.layout.format(&event);
        self.write(&file_name, &contents, event).await
    }

    /// Delete expired files matching `rule`, best effort
    ///
    /// A file is deleted only when its name matches the rule's pattern,
    /// the name carries an eight-digit date token and its creation
    /// timestamp falls strictly before the rule's threshold. A failed
    /// delete is reported to the diagnostic channel and the sweep moves
    /// on; cleanup itself fails only when the directory cannot be
    /// initialized or listed.
    #[instrument(skip_all)]
    pub async fn cleanup(&self, rule: &RetentionRule) -> Result<(), SinkError> {
        let folder = self.folder().await?;
        let files = folder.list_files().await.map_err(SinkError::List)?;

        let mut deleted = 0usize;
        for file in &files {
            let name = file.name();
            if !rule.pattern_matches(name) || !has_date_token(name) {
                continue;
            }
            let created = match file.created_at().await {
                Ok(created) => created,
                Err(e) => {
                    self.internal
                        .warn(&format!("Failed to inspect '{name}'."), &e);
                    continue;
                }
            };
            if !rule.is_expired(created) {
                continue;
            }
            if let Err(e) = file.delete().await {
                self.internal.warn(&format!("Failed to delete '{name}'."), &e);
            } else {
                deleted += 1;
            }
        }
        debug!(examined = files.len(), deleted, "Cleanup sweep finished");
        Ok(())
    }

    /// Bundle every current file into an in-memory zip archive
    ///
    /// Entry names are the file names; entry order follows the directory
    /// listing. The returned cursor is rewound to the start so it can be
    /// consumed immediately. A failure reading any file aborts the whole
    /// export; no partial archive is returned.
    #[instrument(skip_all)]
    pub async fn export_compressed(&self) -> Result<Cursor<Vec<u8>>, SinkError> {
        let folder = self.folder().await?;
        let files = folder.list_files().await.map_err(SinkError::List)?;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut bytes = 0usize;
        for file in &files {
            let contents = file
                .read_text()
                .await
                .map_err(|e| SinkError::export_read(file.name(), e))?;
            writer
                .start_file(file.name(), SimpleFileOptions::default())
                .map_err(|e| SinkError::archive(e.to_string()))?;
            writer
                .write_all(contents.as_bytes())
                .map_err(|e| SinkError::archive(e.to_string()))?;
            bytes += contents.len();
        }

        let mut cursor = writer
            .finish()
            .map_err(|e| SinkError::archive(e.to_string()))?;
        cursor.set_position(0);
        debug!(files = files.len(), bytes, "Export archive assembled");
        Ok(cursor)
    }
}
