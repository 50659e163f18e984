//! # Logshed Storage
//!
//! Sandboxed storage-folder abstraction for logshed sinks.
//!
//! Sinks never touch raw filesystem paths. They work against a folder handle
//! obtained from a storage root, and every operation on it is asynchronous
//! and fallible. Names are plain strings validated by the backend; anything
//! that would escape the folder (separators, `..`) is rejected, so the root
//! acts as a sandbox boundary.
//!
//! ## Features
//!
//! - **StorageFolder / StorageFile traits**: open-or-create, list, append,
//!   read, delete, creation timestamp
//! - **FsFolder**: filesystem backend over `tokio::fs` for production
//! - **InMemoryFolder**: `DashMap` backend for tests and simulation, with
//!   failure injection (locked files, denied folder creation)
//!
//! ## Example
//!
//! ```rust,ignore
//! use logshed_storage::{FsFolder, StorageFile, StorageFolder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), logshed_storage::StorageError> {
//!     let root = FsFolder::create("/var/lib/myapp").await?;
//!     let logs = root.open_or_create_folder("logs").await?;
//!
//!     let file = logs.open_or_create_file("log-20240115.txt").await?;
//!     file.append_text("hello\n").await?;
//!     assert_eq!(file.read_text().await?, "hello\n");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fs;
pub mod memory;

// Re-exports
pub use error::StorageError;
pub use fs::{FsFile, FsFolder};
pub use memory::{InMemoryFile, InMemoryFolder};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A folder handle in sandboxed storage
///
/// Folders hand out further folder and file handles by name. Both opening
/// operations are open-if-exists: they succeed whether or not the target
/// already exists, and repeated calls with the same name refer to the same
/// underlying folder or file.
#[async_trait]
pub trait StorageFolder: Send + Sync {
    /// File handle type produced by this folder
    type File: StorageFile;

    /// Open a subfolder, creating it if it does not exist
    async fn open_or_create_folder(&self, name: &str) -> Result<Self, StorageError>
    where
        Self: Sized;

    /// Open a file in this folder, creating it empty if it does not exist
    async fn open_or_create_file(&self, name: &str) -> Result<Self::File, StorageError>;

    /// List every file currently in this folder
    ///
    /// Subfolders are not included. Order is unspecified and may differ
    /// between calls; the only guarantee is that every current file appears
    /// exactly once.
    async fn list_files(&self) -> Result<Vec<Self::File>, StorageError>;
}

/// A file handle in sandboxed storage
///
/// Handles are references, not open descriptors: each operation resolves the
/// file anew, so a handle stays valid across appends by other handles and
/// reports `FileNotFound` once the file is deleted.
#[async_trait]
pub trait StorageFile: Send + Sync {
    /// The file's name within its folder
    fn name(&self) -> &str;

    /// Append text to the end of the file
    async fn append_text(&self, text: &str) -> Result<(), StorageError>;

    /// Read the file's entire content as UTF-8 text
    async fn read_text(&self) -> Result<String, StorageError>;

    /// Delete the file
    async fn delete(&self) -> Result<(), StorageError>;

    /// When the file was created
    async fn created_at(&self) -> Result<DateTime<Utc>, StorageError>;
}

/// Reject names that are empty or would escape the folder
pub(crate) fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::invalid_name("(empty)"));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StorageError::invalid_name(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that the traits are object-safe with a concrete file type
    fn _assert_object_safe(_: &dyn StorageFolder<File = InMemoryFile>, _: &dyn StorageFile) {}

    #[test]
    fn test_validate_name_accepts_plain_names() {
        assert!(validate_name("log-20240115.txt").is_ok());
        assert!(validate_name("notes.txt").is_ok());
        assert!(validate_name(".hidden").is_ok());
    }

    #[test]
    fn test_validate_name_rejects_escapes() {
        assert!(validate_name("").is_err());
        assert!(validate_name(".").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("a\\b").is_err());
        assert!(validate_name("../outside").is_err());
    }

    #[tokio::test]
    async fn test_backends_share_the_trait_surface() {
        let root = InMemoryFolder::new();
        let folder = root.open_or_create_folder("logs").await.unwrap();

        let file = folder.open_or_create_file("f.txt").await.unwrap();
        file.append_text("x").await.unwrap();

        assert_eq!(file.read_text().await.unwrap(), "x");
        assert_eq!(folder.list_files().await.unwrap().len(), 1);
    }
}
