//! Error types for logshed-storage
//!
//! This module defines the error types used by every storage backend.

use thiserror::Error;

/// Errors that can occur in storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during a storage operation
    #[error("I/O error: {0}")]
    Io(String),

    /// Requested file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The file is held by another process and cannot be touched
    #[error("File locked: {0}")]
    FileLocked(String),

    /// The provider refused access to the folder or file
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Name is empty or would escape the sandbox
    #[error("Invalid name: {0}")]
    InvalidName(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl StorageError {
    /// Create a new FileNotFound error
    pub fn file_not_found(name: impl Into<String>) -> Self {
        Self::FileNotFound(name.into())
    }

    /// Create a new FileLocked error
    pub fn file_locked(name: impl Into<String>) -> Self {
        Self::FileLocked(name.into())
    }

    /// Create a new AccessDenied error
    pub fn access_denied(name: impl Into<String>) -> Self {
        Self::AccessDenied(name.into())
    }

    /// Create a new InvalidName error
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }

    /// Create a new I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }
}
