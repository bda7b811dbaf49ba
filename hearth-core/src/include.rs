//! Include executor
//!
//! Resolves, compiles (through the cache) and runs script files in the
//! caller's execution scope, one after another.

use std::rc::Rc;

use tracing::{debug, info_span};

use crate::cache::ScriptCache;
use crate::engine::{CompiledScript, ScriptEngine, ScriptOrigin};
use crate::error::HostError;
use crate::resolver::FileResolver;
use crate::value::{NativeFunction, Value};

pub struct IncludeExecutor {
    resolver: FileResolver,
    cache: Rc<ScriptCache>,
}

impl IncludeExecutor {
    pub fn new(resolver: FileResolver, cache: Rc<ScriptCache>) -> Self {
        Self { resolver, cache }
    }

    pub fn resolver(&self) -> &FileResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &Rc<ScriptCache> {
        &self.cache
    }

    /// Include each path in order.
    ///
    /// Stops at the first failure; later paths are not resolved or run.
    pub fn include<S: AsRef<str>>(
        &self,
        engine: &mut dyn ScriptEngine,
        paths: &[S],
    ) -> Result<(), HostError> {
        for path in paths {
            self.include_one(engine, path.as_ref())?;
        }
        Ok(())
    }

    /// Resolve, compile and run a single file, returning the script's result
    pub fn include_one(&self, engine: &mut dyn ScriptEngine, path: &str) -> Result<Value, HostError> {
        let _span = info_span!(target: "hearth::include", "include", path).entered();
        let script = self.compile(engine, path)?;
        debug!(target: "hearth::include", path, "running");
        engine.run(&script)
    }

    /// Resolve and compile `path` without running it
    pub fn compile(&self, engine: &mut dyn ScriptEngine, path: &str) -> Result<CompiledScript, HostError> {
        let resolved = self.resolver.resolve(path)?;
        let origin = ScriptOrigin::new(path);
        self.cache.get_or_compile(&resolved.key, &resolved.text, resolved.modified, |source| {
            engine.compile(source, &origin)
        })
    }

    /// The script-facing `include(path, ...)` function
    pub fn into_function(self: Rc<Self>) -> NativeFunction {
        NativeFunction::new("include", move |engine, args| {
            let paths = args
                .iter()
                .map(|arg| {
                    arg.as_str().ok_or_else(|| {
                        HostError::type_error(format!(
                            "include expects string paths, got {}",
                            arg.type_name()
                        ))
                    })
                })
                .collect::<Result<Vec<&str>, HostError>>()?;
            self.include(engine, &paths)?;
            Ok(Value::Undefined)
        })
    }
}
