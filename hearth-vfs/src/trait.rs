//! VirtualFileSystem trait definition

use crate::error::{VfsError, VfsResult};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Virtual File System trait
///
/// Provides a unified interface for file operations, decoupling the host from
/// specific file system implementations.
///
/// # Implementations
/// - `MemoryFileSystem`: In-memory file system
/// - `NativeFileSystem`: Native OS file system
pub trait VirtualFileSystem: Send + Sync {
    /// Read file contents
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Write file contents
    ///
    /// Creates the file if it doesn't exist, truncates it if it does.
    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Last modification time of a file
    fn modified(&self, path: &Path) -> VfsResult<SystemTime>;

    /// Stable identity of a path, used as a cache key
    ///
    /// The default returns the path unchanged.
    fn canonicalize(&self, path: &Path) -> VfsResult<PathBuf> {
        Ok(path.to_path_buf())
    }

    /// Read a file and decode it as UTF-8
    fn read_to_string(&self, path: &Path) -> VfsResult<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|_| VfsError::InvalidUtf8 {
            path: path.to_string_lossy().to_string(),
        })
    }
}
