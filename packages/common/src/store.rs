//! # Document Store
//!
//! Abstraction over the vault a note lives in. Operations complete
//! asynchronously on the host's single-threaded executor; callers never
//! block on them.
//!
//! Paths are `/`-separated strings relative to the vault root and are
//! unique: at most one file exists per path.

use crate::{StoreError, StoreResult};
use futures::future::{self, FutureExt, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;
use tracing::debug;
use walkdir::WalkDir;

/// Future returned by store operations
pub type StoreFuture<T> = LocalBoxFuture<'static, StoreResult<T>>;

/// Handle to a file that exists in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoredFile {
    path: String,
}

impl StoredFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Vault of files a document can embed
pub trait DocumentStore {
    /// Enumerate every file in the store
    fn files(&self) -> Vec<StoredFile>;

    /// Read a file's bytes
    fn read_binary(&self, file: &StoredFile) -> StoreFuture<Vec<u8>>;

    /// Create a new file; fails if one already exists at `path`
    fn create_binary(&self, path: &str, data: Vec<u8>) -> StoreFuture<StoredFile>;

    /// Overwrite an existing file
    fn modify_binary(&self, file: &StoredFile, data: Vec<u8>) -> StoreFuture<()>;

    /// URL a static renderer can point an `<img>` at
    fn resource_url(&self, file: &StoredFile) -> String;
}

/// In-memory store. Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file directly (bypasses the write counter)
    pub fn insert(&self, path: impl Into<String>, data: Vec<u8>) {
        self.files.borrow_mut().insert(path.into(), data);
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }

    /// Number of create/modify calls that reached the store
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl DocumentStore for MemoryStore {
    fn files(&self) -> Vec<StoredFile> {
        self.files.borrow().keys().map(StoredFile::new).collect()
    }

    fn read_binary(&self, file: &StoredFile) -> StoreFuture<Vec<u8>> {
        let result = self
            .get(file.path())
            .ok_or_else(|| StoreError::NotFound(file.path().to_string()));
        future::ready(result).boxed_local()
    }

    fn create_binary(&self, path: &str, data: Vec<u8>) -> StoreFuture<StoredFile> {
        let result = if self.contains(path) {
            Err(StoreError::AlreadyExists(path.to_string()))
        } else {
            self.writes.set(self.writes.get() + 1);
            self.insert(path, data);
            Ok(StoredFile::new(path))
        };
        future::ready(result).boxed_local()
    }

    fn modify_binary(&self, file: &StoredFile, data: Vec<u8>) -> StoreFuture<()> {
        let mut files = self.files.borrow_mut();
        let result = match files.get_mut(file.path()) {
            Some(existing) => {
                self.writes.set(self.writes.get() + 1);
                *existing = data;
                Ok(())
            }
            None => Err(StoreError::NotFound(file.path().to_string())),
        };
        future::ready(result).boxed_local()
    }

    fn resource_url(&self, file: &StoredFile) -> String {
        format!("memory://{}", file.path())
    }
}

/// Store backed by a directory on disk
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a vault path, rejecting anything that escapes the root
    fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.is_empty() || escapes {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl DocumentStore for DiskStore {
    fn files(&self) -> Vec<StoredFile> {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let parts: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                Some(StoredFile::new(parts.join("/")))
            })
            .collect()
    }

    fn read_binary(&self, file: &StoredFile) -> StoreFuture<Vec<u8>> {
        let result = self.resolve(file.path()).and_then(|full| {
            std::fs::read(&full).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => StoreError::NotFound(file.path().to_string()),
                _ => StoreError::Io(e),
            })
        });
        future::ready(result).boxed_local()
    }

    fn create_binary(&self, path: &str, data: Vec<u8>) -> StoreFuture<StoredFile> {
        let result = self.resolve(path).and_then(|full| {
            if full.exists() {
                return Err(StoreError::AlreadyExists(path.to_string()));
            }
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full, data)?;
            debug!(path = %path, "Created file");
            Ok(StoredFile::new(path))
        });
        future::ready(result).boxed_local()
    }

    fn modify_binary(&self, file: &StoredFile, data: Vec<u8>) -> StoreFuture<()> {
        let result = self.resolve(file.path()).and_then(|full| {
            if !full.is_file() {
                return Err(StoreError::NotFound(file.path().to_string()));
            }
            std::fs::write(&full, data)?;
            debug!(path = %file.path(), "Overwrote file");
            Ok(())
        });
        future::ready(result).boxed_local()
    }

    fn resource_url(&self, file: &StoredFile) -> String {
        format!("file://{}", self.root.join(file.path()).display())
    }
}
