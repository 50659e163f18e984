//! Sink error taxonomy
//!
//! Only failures that propagate to the caller live here. A failed delete
//! during a cleanup sweep is reported through the diagnostic channel and
//! never becomes a `SinkError`.

use logshed_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    /// The managed directory could not be opened or created
    #[error("failed to initialize log directory '{dir}': {source}")]
    Initialize {
        dir: String,
        #[source]
        source: StorageError,
    },

    /// An event could not be appended to its file
    #[error("failed to write log file '{file}': {source}")]
    Write {
        file: String,
        #[source]
        source: StorageError,
    },

    /// The managed directory could not be listed
    #[error("failed to list log files: {0}")]
    List(#[source] StorageError),

    /// A file could not be read back while building an export
    #[error("failed to read '{file}' during export: {source}")]
    ExportRead {
        file: String,
        #[source]
        source: StorageError,
    },

    /// The export archive could not be assembled
    #[error("failed to build export archive: {0}")]
    Archive(String),
}

impl SinkError {
    /// Create a new Initialize error
    pub fn initialize(dir: impl Into<String>, source: StorageError) -> Self {
        Self::Initialize {
            dir: dir.into(),
            source,
        }
    }

    /// Create a new Write error
    pub fn write(file: impl Into<String>, source: StorageError) -> Self {
        Self::Write {
            file: file.into(),
            source,
        }
    }

    /// Create a new ExportRead error
    pub fn export_read(file: impl Into<String>, source: StorageError) -> Self {
        Self::ExportRead {
            file: file.into(),
            source,
        }
    }

    /// Create a new Archive error
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_initialize_names_the_directory() {
        let err = SinkError::initialize("logs", StorageError::access_denied("logs"));
        assert!(err.to_string().contains("logs"));
        assert!(matches!(err, SinkError::Initialize { .. }));
    }

    #[test]
    fn test_write_names_the_file() {
        let err = SinkError::write("log-20240115.txt", StorageError::io("disk full"));
        assert!(err.to_string().contains("log-20240115.txt"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_export_read_names_the_file() {
        let err = SinkError::export_read("a.txt", StorageError::file_locked("a.txt"));
        assert!(err.to_string().contains("a.txt"));
        assert!(matches!(err, SinkError::ExportRead { .. }));
    }

    #[test]
    fn test_source_chain_is_preserved() {
        let err = SinkError::write("f.txt", StorageError::file_locked("f.txt"));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("locked"));
    }

    #[test]
    fn test_archive_carries_message() {
        let err = SinkError::archive("zip finish failed");
        assert_eq!(err.to_string(), "failed to build export archive: zip finish failed");
    }
}
