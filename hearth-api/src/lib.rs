//! Hearth API - Host assembly layer
//!
//! Provides the embedder-facing interface, including:
//! - Host assembly (file system, script cache, extension registry, global scope)
//! - Configuration abstraction (RunConfig)
//! - Unified error reporting (ErrorReport)
//!
//! For CLI convenience, this crate provides a global config singleton.
//! For library use, prefer passing a `HostConfig` to [`Host::new`].

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, info};

use hearth_core::{
    BuiltinModule, Console, ExtensionRegistry, FileResolver, GlobalScope, GlobalScopeBuilder,
    IncludeExecutor, LoadedExtension, ResolvedSource, ScriptCache, ScriptEngine,
};
use hearth_vfs::{NativeFileSystem, VirtualFileSystem};

// Re-export config
pub mod config;
pub use config::{config as get_config, init as init_config, ConfigError, RunConfig};

// Re-export config types from hearth_config
pub use hearth_config::{CacheConfig, CachePolicy, Component, HostConfig, LogLevel, LoggingConfig};

// Re-export error types
pub mod error;
pub use error::{ErrorDetails, ErrorReport, ToReport};

// Re-export core types
pub use hearth_config;
pub use hearth_core;
pub use hearth_core::{HostError, Object, ObjectRef, Value};

/// An assembled host: one global scope plus the services behind it
pub struct Host {
    config: HostConfig,
    vfs: Arc<dyn VirtualFileSystem>,
    cache: Rc<ScriptCache>,
    includer: Rc<IncludeExecutor>,
    extensions: Rc<ExtensionRegistry>,
    scope: GlobalScope,
}

impl Host {
    /// Host on the native file system, printing to stdout
    pub fn new(config: HostConfig) -> Self {
        HostBuilder::new(config).build()
    }

    pub fn builder(config: HostConfig) -> HostBuilder {
        HostBuilder::new(config)
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn scope(&self) -> &GlobalScope {
        &self.scope
    }

    pub fn cache(&self) -> &ScriptCache {
        &self.cache
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn vfs(&self) -> &Arc<dyn VirtualFileSystem> {
        &self.vfs
    }

    /// Expose the global scope to an engine
    pub fn install(&self, engine: &mut dyn ScriptEngine) {
        self.scope.install(engine);
    }

    /// Run the entry script, returning its result
    pub fn run_entry(&self, engine: &mut dyn ScriptEngine, path: &str) -> Result<Value, HostError> {
        info!(entry = path, "running entry script");
        self.includer.include_one(engine, path)
    }

    /// Include scripts in order, stopping at the first failure
    pub fn include<S: AsRef<str>>(&self, engine: &mut dyn ScriptEngine, paths: &[S]) -> Result<(), HostError> {
        self.includer.include(engine, paths)
    }

    /// Resolve a script path without compiling it
    pub fn resolve(&self, path: &str) -> Result<ResolvedSource, HostError> {
        self.includer.resolver().resolve(path).map_err(HostError::from)
    }

    /// Every location `include` would try for `path`, in order
    pub fn candidates(&self, path: &str) -> Vec<PathBuf> {
        self.includer.resolver().candidates(path)
    }

    /// Load a native extension and attach it to `builtin`
    pub fn load_extension(&self, path: &str) -> Result<LoadedExtension, HostError> {
        let extension = self.extensions.load(path)?;
        self.scope
            .builtin()
            .borrow_mut()
            .set(extension.name.clone(), Value::Object(extension.exports.clone()));
        Ok(extension)
    }
}

/// Step-by-step host assembly
pub struct HostBuilder {
    config: HostConfig,
    vfs: Option<Arc<dyn VirtualFileSystem>>,
    console: Option<Console>,
    modules: Vec<Box<dyn BuiltinModule>>,
}

impl HostBuilder {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            vfs: None,
            console: None,
            modules: Vec::new(),
        }
    }

    /// Use a specific file system (defaults to the native one)
    pub fn vfs(mut self, vfs: Arc<dyn VirtualFileSystem>) -> Self {
        self.vfs = Some(vfs);
        self
    }

    /// Redirect log/print/println output
    pub fn console(mut self, console: Console) -> Self {
        self.console = Some(console);
        self
    }

    /// Register a built-in module; modules register in the order added
    pub fn module(mut self, module: impl BuiltinModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn build(self) -> Host {
        let vfs = self
            .vfs
            .unwrap_or_else(|| Arc::new(NativeFileSystem::new()) as Arc<dyn VirtualFileSystem>);
        let cache = Rc::new(ScriptCache::new(self.config.cache.policy));
        let includer = Rc::new(IncludeExecutor::new(FileResolver::new(vfs.clone()), cache.clone()));
        let extensions = Rc::new(ExtensionRegistry::new());

        let mut scope = GlobalScopeBuilder::new(includer.clone(), extensions.clone());
        if let Some(console) = self.console {
            scope = scope.console(console);
        }
        for module in self.modules {
            scope = scope.module(module);
        }
        let scope = scope.build();

        debug!(policy = ?self.config.cache.policy, "host assembled");

        Host {
            config: self.config,
            vfs,
            cache,
            includer,
            extensions,
            scope,
        }
    }
}
