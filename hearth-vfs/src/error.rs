//! VFS Error Types

use std::fmt;

/// Result type for VFS operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Error type for VFS operations
#[derive(Debug, Clone, PartialEq)]
pub enum VfsError {
    /// File or directory not found
    NotFound { path: String },

    /// Permission denied
    PermissionDenied { path: String },

    /// File content is not valid UTF-8
    InvalidUtf8 { path: String },

    /// Backend cannot report the requested metadata
    Unsupported { operation: &'static str },

    /// IO error
    Io { message: String },
}

impl VfsError {
    /// Map an `std::io::Error` for `path` onto the VFS vocabulary
    pub fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        let path = path.to_string_lossy().to_string();
        match err.kind() {
            std::io::ErrorKind::NotFound => VfsError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => VfsError::PermissionDenied { path },
            _ => VfsError::Io {
                message: format!("{}: {}", path, err),
            },
        }
    }
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::NotFound { path } => write!(f, "Path not found: {}", path),
            VfsError::PermissionDenied { path } => write!(f, "Permission denied: {}", path),
            VfsError::InvalidUtf8 { path } => write!(f, "File is not valid UTF-8: {}", path),
            VfsError::Unsupported { operation } => {
                write!(f, "Operation not supported by this backend: {}", operation)
            }
            VfsError::Io { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for VfsError {}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        VfsError::Io {
            message: err.to_string(),
        }
    }
}
