//! In-memory storage backend
//!
//! A process-local implementation of the storage traits, used in tests and
//! anywhere a real filesystem is unwanted. Folders share state through an
//! `Arc`, so two handles obtained for the same name always observe the same
//! files.
//!
//! The backend can also inject failures: [`InMemoryFolder::lock`] makes
//! content operations on one file fail with [`StorageError::FileLocked`]
//! while its metadata stays readable, [`InMemoryFolder::deny_metadata`]
//! makes one file's creation timestamp unreadable,
//! [`InMemoryFolder::deny_folder_creation`] makes folder opens fail with
//! [`StorageError::AccessDenied`], and [`InMemoryFolder::fail_listing`]
//! makes listing fail.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};

use crate::error::StorageError;
use crate::{StorageFile, StorageFolder, validate_name};

#[derive(Debug, Clone)]
struct FileRecord {
    contents: String,
    created: DateTime<Utc>,
}

impl FileRecord {
    fn new() -> Self {
        Self {
            contents: String::new(),
            created: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
struct FolderState {
    subfolders: DashMap<String, Arc<FolderState>>,
    files: DashMap<String, FileRecord>,
    locked: DashSet<String>,
    metadata_denied: DashSet<String>,
    deny_folder_creation: AtomicBool,
    fail_listing: AtomicBool,
    folder_opens: AtomicUsize,
}

/// An in-memory directory
///
/// Cloning produces another handle onto the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFolder {
    state: Arc<FolderState>,
}

impl InMemoryFolder {
    /// Create an empty root folder
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file with the given contents, created now
    pub fn insert_file(&self, name: &str, contents: &str) {
        self.insert_file_created(name, contents, Utc::now());
    }

    /// Insert a file with an explicit creation timestamp
    pub fn insert_file_created(&self, name: &str, contents: &str, created: DateTime<Utc>) {
        self.state.files.insert(
            name.to_string(),
            FileRecord {
                contents: contents.to_string(),
                created,
            },
        );
    }

    /// Make append, read and delete on the named file fail with `FileLocked`
    pub fn lock(&self, name: &str) {
        self.state.locked.insert(name.to_string());
    }

    /// Lift a lock set by [`lock`](Self::lock)
    pub fn unlock(&self, name: &str) {
        self.state.locked.remove(name);
    }

    /// Make `created_at` on the named file fail with `AccessDenied`
    pub fn deny_metadata(&self, name: &str) {
        self.state.metadata_denied.insert(name.to_string());
    }

    /// Lift a denial set by [`deny_metadata`](Self::deny_metadata)
    pub fn allow_metadata(&self, name: &str) {
        self.state.metadata_denied.remove(name);
    }

    /// Make subsequent folder opens fail with `AccessDenied`
    pub fn deny_folder_creation(&self, deny: bool) {
        self.state.deny_folder_creation.store(deny, Ordering::SeqCst);
    }

    /// Make subsequent `list_files` calls on this folder fail
    pub fn fail_listing(&self, fail: bool) {
        self.state.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// How many times `open_or_create_folder` was called on this folder
    pub fn folder_open_count(&self) -> usize {
        self.state.folder_opens.load(Ordering::SeqCst)
    }

    /// Handle onto an existing subfolder, if one was created
    pub fn subfolder(&self, name: &str) -> Option<Self> {
        self.state.subfolders.get(name).map(|entry| Self {
            state: Arc::clone(entry.value()),
        })
    }

    /// Whether a file with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.state.files.contains_key(name)
    }

    /// Number of files in this folder
    pub fn file_count(&self) -> usize {
        self.state.files.len()
    }

    /// Contents of the named file, bypassing locks
    pub fn read(&self, name: &str) -> Option<String> {
        self.state.files.get(name).map(|r| r.contents.clone())
    }
}

#[async_trait]
impl StorageFolder for InMemoryFolder {
    type File = InMemoryFile;

    async fn open_or_create_folder(&self, name: &str) -> Result<Self, StorageError>
    where
        Self: Sized,
    {
        validate_name(name)?;
        // Count the attempt even when it is about to be denied
        self.state.folder_opens.fetch_add(1, Ordering::SeqCst);
        if self.state.deny_folder_creation.load(Ordering::SeqCst) {
            return Err(StorageError::access_denied(name));
        }
        let child = Arc::clone(
            self.state
                .subfolders
                .entry(name.to_string())
                .or_default()
                .value(),
        );
        Ok(Self { state: child })
    }

    async fn open_or_create_file(&self, name: &str) -> Result<InMemoryFile, StorageError> {
        validate_name(name)?;
        self.state
            .files
            .entry(name.to_string())
            .or_insert_with(FileRecord::new);
        Ok(InMemoryFile {
            name: name.to_string(),
            folder: Arc::clone(&self.state),
        })
    }

    async fn list_files(&self) -> Result<Vec<InMemoryFile>, StorageError> {
        if self.state.fail_listing.load(Ordering::SeqCst) {
            return Err(StorageError::io("directory listing failed"));
        }
        Ok(self
            .state
            .files
            .iter()
            .map(|entry| InMemoryFile {
                name: entry.key().clone(),
                folder: Arc::clone(&self.state),
            })
            .collect())
    }
}

/// A file inside an [`InMemoryFolder`]
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    name: String,
    folder: Arc<FolderState>,
}

impl InMemoryFile {
    fn check_lock(&self) -> Result<(), StorageError> {
        if self.folder.locked.contains(&self.name) {
            return Err(StorageError::file_locked(self.name.as_str()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageFile for InMemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn append_text(&self, text: &str) -> Result<(), StorageError> {
        self.check_lock()?;
        // Recreate the record if the file was deleted under this handle,
        // matching the append-or-create behavior of the filesystem backend
        self.folder
            .files
            .entry(self.name.clone())
            .or_insert_with(FileRecord::new)
            .contents
            .push_str(text);
        Ok(())
    }

    async fn read_text(&self) -> Result<String, StorageError> {
        self.check_lock()?;
        self.folder
            .files
            .get(&self.name)
            .map(|r| r.contents.clone())
            .ok_or_else(|| StorageError::file_not_found(self.name.as_str()))
    }

    async fn delete(&self) -> Result<(), StorageError> {
        self.check_lock()?;
        self.folder
            .files
            .remove(&self.name)
            .map(|_| ())
            .ok_or_else(|| StorageError::file_not_found(self.name.as_str()))
    }

    async fn created_at(&self) -> Result<DateTime<Utc>, StorageError> {
        if self.folder.metadata_denied.contains(&self.name) {
            return Err(StorageError::access_denied(self.name.as_str()));
        }
        self.folder
            .files
            .get(&self.name)
            .map(|r| r.created)
            .ok_or_else(|| StorageError::file_not_found(self.name.as_str()))
    }
}
