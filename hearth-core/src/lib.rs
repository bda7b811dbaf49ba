//! Hearth Core - bootstrap layer of an embeddable scripting host
//!
//! Builds the global scope a script runs in, resolves and runs included
//! script files through a compiled-script cache, and loads native extension
//! libraries at runtime.
//!
//! The script engine itself is external and plugged in through
//! [`ScriptEngine`]. File access goes through `hearth_vfs`, and configuration
//! is passed explicitly, never through global state.

pub mod cache;
pub mod engine;
pub mod error;
pub mod extension;
pub mod include;
pub mod output;
pub mod resolver;
pub mod scope;
pub mod value;

pub use cache::{CacheStats, CachedScript, ScriptCache};
pub use engine::{CompiledScript, ScriptEngine, ScriptOrigin};
pub use error::{CompileError, HostError, LoadError, LoadErrorKind, ResolveError};
pub use extension::{EntryPoint, ExtensionRegistry, LoadedExtension, NativeModule, ENTRY_POINT};
pub use include::IncludeExecutor;
pub use output::{CaptureBuffer, Console};
pub use resolver::{FileResolver, ResolvedSource, SEARCH_PREFIXES};
pub use scope::{BuiltinModule, GlobalScope, GlobalScopeBuilder};
pub use value::{HostFn, NativeFunction, Object, ObjectRef, Value};

// Re-export config types from hearth-config
pub use hearth_config::CachePolicy;
