//! Filesystem-backed storage
//!
//! Implements the storage traits over `tokio::fs`, rooted at one directory
//! that acts as the sandbox boundary. File handles carry only a path; every
//! operation opens the file anew, so concurrent handles to the same name
//! stay coherent.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

use crate::error::StorageError;
use crate::{StorageFile, StorageFolder, validate_name};

/// Map an I/O error onto the storage taxonomy for the named item
fn map_io(name: &str, err: std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::FileNotFound(name.to_string()),
        ErrorKind::PermissionDenied => StorageError::AccessDenied(name.to_string()),
        _ => StorageError::Io(err.to_string()),
    }
}

/// A directory on the local filesystem
///
/// Handles are cheap to clone; they carry only the path.
#[derive(Debug, Clone)]
pub struct FsFolder {
    path: PathBuf,
}

impl FsFolder {
    /// Wrap an existing directory without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the directory (and any missing parents) and wrap it
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        debug!(path = %path.display(), "Created storage folder");
        Ok(Self { path })
    }

    /// The directory this handle points at
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageFolder for FsFolder {
    type File = FsFile;

    async fn open_or_create_folder(&self, name: &str) -> Result<Self, StorageError>
    where
        Self: Sized,
    {
        validate_name(name)?;
        let path = self.path.join(name);
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| map_io(name, e))?;
        trace!(path = %path.display(), "Opened subfolder");
        Ok(Self { path })
    }

    async fn open_or_create_file(&self, name: &str) -> Result<FsFile, StorageError> {
        validate_name(name)?;
        let path = self.path.join(name);
        // Touch the file so the handle always refers to an existing file
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await
            .map_err(|e| map_io(name, e))?;
        Ok(FsFile {
            name: name.to_string(),
            path,
        })
    }

    async fn list_files(&self) -> Result<Vec<FsFile>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
            if !file_type.is_file() {
                continue;
            }
            files.push(FsFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
            });
        }
        Ok(files)
    }
}

/// A file on the local filesystem
#[derive(Debug, Clone)]
pub struct FsFile {
    name: String,
    path: PathBuf,
}

impl FsFile {
    /// Full path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageFile for FsFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn append_text(&self, text: &str) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .map_err(|e| map_io(&self.name, e))?;
        file.write_all(text.as_bytes())
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        // tokio files buffer internally; unflushed data may still be in
        // flight when the handle drops
        file.flush()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }

    async fn read_text(&self) -> Result<String, StorageError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| map_io(&self.name, e))
    }

    async fn delete(&self) -> Result<(), StorageError> {
        tokio::fs::remove_file(&self.path)
            .await
            .map_err(|e| map_io(&self.name, e))?;
        trace!(file = %self.name, "Deleted file");
        Ok(())
    }

    async fn created_at(&self) -> Result<DateTime<Utc>, StorageError> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| map_io(&self.name, e))?;
        // Not every filesystem records a birth time; fall back to mtime
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(DateTime::<Utc>::from(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    async fn create_test_folder() -> (FsFolder, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let folder = FsFolder::new(temp_dir.path());
        (folder, temp_dir)
    }

    #[tokio::test]
    async fn test_create_builds_missing_parents() {
        let temp_dir = TempDir::new().unwrap();

        let folder = FsFolder::create(temp_dir.path().join("a").join("b"))
            .await
            .unwrap();
        assert!(folder.path().is_dir());
    }

    #[tokio::test]
    async fn test_open_or_create_folder_is_idempotent() {
        let (root, _temp) = create_test_folder().await;

        let first = root.open_or_create_folder("logs").await.unwrap();
        let file = first.open_or_create_file("f.txt").await.unwrap();
        file.append_text("x").await.unwrap();

        // Opening again must see the same directory, not a fresh one
        let second = root.open_or_create_folder("logs").await.unwrap();
        assert_eq!(first.path(), second.path());
        assert_eq!(second.list_files().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_open_or_create_file_touches() {
        let (root, _temp) = create_test_folder().await;

        let file = root.open_or_create_file("f.txt").await.unwrap();
        assert!(file.path().exists());
        assert_eq!(file.read_text().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_append_accumulates_in_order() {
        let (root, _temp) = create_test_folder().await;

        let file = root.open_or_create_file("f.txt").await.unwrap();
        file.append_text("a\n").await.unwrap();
        file.append_text("b\n").await.unwrap();

        assert_eq!(file.read_text().await.unwrap(), "a\nb\n");
    }

    #[tokio::test]
    async fn test_append_via_second_handle() {
        let (root, _temp) = create_test_folder().await;

        let first = root.open_or_create_file("f.txt").await.unwrap();
        first.append_text("a").await.unwrap();

        let second = root.open_or_create_file("f.txt").await.unwrap();
        second.append_text("b").await.unwrap();

        assert_eq!(first.read_text().await.unwrap(), "ab");
    }

    #[tokio::test]
    async fn test_list_files_skips_directories() {
        let (root, _temp) = create_test_folder().await;

        root.open_or_create_folder("subdir").await.unwrap();
        root.open_or_create_file("a.txt").await.unwrap();
        root.open_or_create_file("b.txt").await.unwrap();

        let mut names: Vec<String> = root
            .list_files()
            .await
            .unwrap()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let (root, _temp) = create_test_folder().await;

        let file = root.open_or_create_file("f.txt").await.unwrap();
        file.delete().await.unwrap();

        assert!(!file.path().exists());
        assert!(root.list_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_not_found() {
        let (root, _temp) = create_test_folder().await;

        let file = root.open_or_create_file("f.txt").await.unwrap();
        file.delete().await.unwrap();

        let err = file.delete().await.unwrap_err();
        assert!(matches!(err, StorageError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let (root, _temp) = create_test_folder().await;

        let file = root.open_or_create_file("f.txt").await.unwrap();
        file.delete().await.unwrap();

        let err = file.read_text().await.unwrap_err();
        assert!(matches!(err, StorageError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_created_at_is_recent() {
        let (root, _temp) = create_test_folder().await;

        let before = Utc::now() - Duration::seconds(5);
        let file = root.open_or_create_file("f.txt").await.unwrap();
        let created = file.created_at().await.unwrap();
        let after = Utc::now() + Duration::seconds(5);

        assert!(created > before);
        assert!(created < after);
    }

    #[tokio::test]
    async fn test_names_cannot_escape_the_sandbox() {
        let (root, _temp) = create_test_folder().await;

        assert!(matches!(
            root.open_or_create_file("../escape.txt").await.unwrap_err(),
            StorageError::InvalidName(_)
        ));
        assert!(matches!(
            root.open_or_create_file("a/b.txt").await.unwrap_err(),
            StorageError::InvalidName(_)
        ));
        assert!(matches!(
            root.open_or_create_folder("").await.unwrap_err(),
            StorageError::InvalidName(_)
        ));
    }
}
