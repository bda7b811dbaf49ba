//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A native OS file system implementation.
///
/// Relative paths are interpreted against the process working directory,
/// exactly as `std::fs` does.
///
/// # Example
/// ```
/// use hearth_vfs::{NativeFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = NativeFileSystem::new();
/// assert!(!fs.exists(Path::new("/definitely/not/here.js")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    /// Create a new native file system.
    pub fn new() -> Self {
        Self
    }
}

impl VirtualFileSystem for NativeFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| VfsError::from_io(e, path))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        std::fs::write(path, content).map_err(|e| VfsError::from_io(e, path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn modified(&self, path: &Path) -> VfsResult<SystemTime> {
        std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|e| VfsError::from_io(e, path))
    }

    fn canonicalize(&self, path: &Path) -> VfsResult<PathBuf> {
        std::fs::canonicalize(path).map_err(|e| VfsError::from_io(e, path))
    }
}
