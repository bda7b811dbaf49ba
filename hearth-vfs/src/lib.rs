//! Hearth Virtual File System
//!
//! A virtual file system abstraction with native and in-memory backends.
//! The script host reads every included file through this trait, so tests
//! and embedders can swap the disk for an in-memory tree.
//!
//! # Usage
//! ```rust
//! use hearth_vfs::{VirtualFileSystem, MemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new();
//! fs.write_file(Path::new("/lib/util.js"), b"var x = 1;").unwrap();
//! let text = fs.read_to_string(Path::new("/lib/util.js")).unwrap();
//! assert_eq!(text, "var x = 1;");
//! ```

mod error;
mod memory;
mod native;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;
pub use r#trait::VirtualFileSystem;

