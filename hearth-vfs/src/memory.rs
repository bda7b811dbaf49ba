//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
struct MemoryFile {
    content: Vec<u8>,
    modified: SystemTime,
}

/// An in-memory file system implementation.
///
/// Files are kept in a `BTreeMap` keyed by their normalized path string.
/// Every write bumps the file's modification time strictly forward, so a
/// rewrite is always observable as a change even within one clock tick.
///
/// # Example
/// ```
/// use hearth_vfs::{MemoryFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::with_files([("/a.js", b"1".to_vec())]);
/// let before = fs.modified(Path::new("/a.js")).unwrap();
/// fs.write_file(Path::new("/a.js"), b"2").unwrap();
/// assert!(fs.modified(Path::new("/a.js")).unwrap() > before);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<String, MemoryFile>>>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new memory file system pre-populated with files.
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let fs = Self::new();
        for (path, content) in files {
            // A fresh map cannot be poisoned.
            let _ = fs.write_file(Path::new(path.as_ref()), &content);
        }
        fs
    }

    /// Override the modification time of an existing file
    pub fn set_modified(&self, path: &Path, modified: SystemTime) -> VfsResult<()> {
        let normalized = normalize_path(path);
        let mut files = self.files.write().map_err(|_| poisoned())?;
        match files.get_mut(&normalized) {
            Some(file) => {
                file.modified = modified;
                Ok(())
            }
            None => Err(VfsError::NotFound { path: normalized }),
        }
    }

    /// Remove a file, returning whether it existed
    pub fn remove_file(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        match self.files.write() {
            Ok(mut files) => files.remove(&normalized).is_some(),
            Err(_) => false,
        }
    }

    /// All stored paths, sorted
    pub fn paths(&self) -> Vec<String> {
        match self.files.read() {
            Ok(files) => files.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Normalize a path string for internal storage.
/// Uses forward slashes consistently for cross-platform compatibility.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn poisoned() -> VfsError {
    VfsError::Io {
        message: String::from("Lock poisoned"),
    }
}

impl VirtualFileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let normalized = normalize_path(path);
        let files = self.files.read().map_err(|_| poisoned())?;
        files
            .get(&normalized)
            .map(|file| file.content.clone())
            .ok_or(VfsError::NotFound { path: normalized })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        let normalized = normalize_path(path);
        let mut files = self.files.write().map_err(|_| poisoned())?;
        let now = SystemTime::now();
        let modified = match files.get(&normalized) {
            Some(previous) if previous.modified >= now => {
                previous.modified + Duration::from_nanos(1)
            }
            _ => now,
        };
        files.insert(
            normalized,
            MemoryFile {
                content: content.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        match self.files.read() {
            Ok(files) => files.contains_key(&normalized),
            Err(_) => false,
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        // Only files are stored; directories are implied by prefixes.
        self.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let mut prefix = normalize_path(path);
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        match self.files.read() {
            Ok(files) => files.keys().any(|key| key.starts_with(&prefix)),
            Err(_) => false,
        }
    }

    fn modified(&self, path: &Path) -> VfsResult<SystemTime> {
        let normalized = normalize_path(path);
        let files = self.files.read().map_err(|_| poisoned())?;
        files
            .get(&normalized)
            .map(|file| file.modified)
            .ok_or(VfsError::NotFound { path: normalized })
    }

    fn canonicalize(&self, path: &Path) -> VfsResult<PathBuf> {
        let normalized = normalize_path(path);
        if self.exists(path) {
            Ok(PathBuf::from(normalized))
        } else {
            Err(VfsError::NotFound { path: normalized })
        }
    }
}
