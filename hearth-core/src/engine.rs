//! The contract between the host and an embedded script engine.
//!
//! The host never looks inside a compiled script; it only asks the engine to
//! compile source text, run what it compiled, and expose named values in the
//! global scope.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::{CompileError, HostError};
use crate::value::Value;

/// Where a piece of source text came from, for engine diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOrigin {
    name: String,
}

impl ScriptOrigin {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Engine-owned, ready-to-run representation of a script.
///
/// Cloning shares the same underlying compilation.
#[derive(Clone)]
pub struct CompiledScript {
    inner: Rc<dyn Any>,
}

impl CompiledScript {
    pub fn new<T: Any>(repr: T) -> Self {
        Self {
            inner: Rc::new(repr),
        }
    }

    /// Recover the engine's own representation
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// True if both handles refer to the same compilation
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for CompiledScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompiledScript({:p})", Rc::as_ptr(&self.inner))
    }
}

/// An embedded script engine.
///
/// Host functions receive `&mut dyn ScriptEngine` when called, so `include`
/// can compile and run further scripts in the scope of its caller.
pub trait ScriptEngine {
    /// Compile source text; `origin` names the file in diagnostics
    fn compile(&mut self, source: &str, origin: &ScriptOrigin) -> Result<CompiledScript, CompileError>;

    /// Run a compiled script synchronously in the current global scope
    fn run(&mut self, script: &CompiledScript) -> Result<Value, HostError>;

    /// Bind `value` under `name` in the global scope
    fn expose(&mut self, name: &str, value: Value);
}
