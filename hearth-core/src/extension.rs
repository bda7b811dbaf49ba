//! Native extension loading
//!
//! A native extension is a shared library exporting [`ENTRY_POINT`]. The
//! loader opens the library, calls the entry point to obtain a
//! [`NativeModule`] and hands the module's exports object to the caller.
//!
//! Libraries are never unloaded. The registry keeps every handle it opened and
//! leaks them when dropped, since exported objects may still point into
//! library code.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::rc::Rc;

use libloading::Library;
use tracing::{debug, info};

use crate::error::{HostError, LoadError, LoadErrorKind};
use crate::value::{NativeFunction, ObjectRef, Value};

/// Symbol every extension library must export
pub const ENTRY_POINT: &str = "getExports";

/// Capability surface produced by an extension
pub trait NativeModule {
    /// Name under which the module is listed in the `builtin` namespace.
    ///
    /// Defaults to the library's file stem.
    fn name(&self) -> Option<&str> {
        None
    }

    /// The object handed to the script that loaded the extension
    fn exports(&self) -> ObjectRef;
}

/// Type of the [`ENTRY_POINT`] function.
///
/// This is a Rust-ABI signature: an extension must be built with the same
/// compiler and the same `hearth-core` as the host. Use [`declare_extension!`]
/// to define it.
///
/// [`declare_extension!`]: crate::declare_extension
pub type EntryPoint = fn() -> Box<dyn NativeModule>;

/// Define the entry point of an extension library.
///
/// ```ignore
/// struct Math;
///
/// impl hearth_core::NativeModule for Math {
///     fn exports(&self) -> hearth_core::ObjectRef {
///         hearth_core::Object::new().with("pi", std::f64::consts::PI).into_ref()
///     }
/// }
///
/// hearth_core::declare_extension!(Math);
/// ```
#[macro_export]
macro_rules! declare_extension {
    ($module:expr) => {
        #[no_mangle]
        #[allow(non_snake_case)]
        pub fn getExports() -> ::std::boxed::Box<dyn $crate::extension::NativeModule> {
            ::std::boxed::Box::new($module)
        }
    };
}

/// One successful load
#[derive(Debug, Clone)]
pub struct LoadedExtension {
    /// Path passed to the loader
    pub path: String,
    pub name: String,
    pub exports: ObjectRef,
}

/// Arena of opened libraries and the modules they produced
#[derive(Default)]
pub struct ExtensionRegistry {
    libraries: RefCell<Vec<Library>>,
    modules: RefCell<Vec<Box<dyn NativeModule>>>,
    loaded: RefCell<Vec<LoadedExtension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path`, call its entry point and return the extension.
    ///
    /// Repeated loads of one path are not deduplicated: the library is opened
    /// again and the entry point called again.
    pub fn load(&self, path: &str) -> Result<LoadedExtension, HostError> {
        let library = open_library(path).map_err(|e| {
            debug!(target: "hearth::extension", path, error = %e, "open failed");
            LoadError::new(LoadErrorKind::LibraryNotFound, path).with_diagnostic(e.to_string())
        })?;

        // SAFETY: the symbol is trusted to have the `EntryPoint` signature.
        let entry = unsafe { library.get::<EntryPoint>(ENTRY_POINT.as_bytes()) }.map(|symbol| *symbol);

        // Kept even when the entry point is missing: the library's
        // initializers have already run.
        self.libraries.borrow_mut().push(library);

        let entry = entry.map_err(|e| {
            debug!(target: "hearth::extension", path, error = %e, "entry point missing");
            LoadError::new(LoadErrorKind::MissingEntryPoint, path).with_diagnostic(e.to_string())
        })?;

        self.instantiate(path, entry).map_err(HostError::from)
    }

    fn instantiate(&self, path: &str, entry: EntryPoint) -> Result<LoadedExtension, LoadError> {
        let produced = panic::catch_unwind(AssertUnwindSafe(|| {
            let module = entry();
            let name = module.name().map(str::to_string);
            let exports = module.exports();
            (module, name, exports)
        }));
        let (module, name, exports) = produced.map_err(|payload| {
            LoadError::new(LoadErrorKind::EntryPointPanicked, path).with_diagnostic(panic_message(&*payload))
        })?;

        let name = name.unwrap_or_else(|| default_name(path));
        let extension = LoadedExtension {
            path: path.to_string(),
            name,
            exports,
        };
        info!(
            target: "hearth::extension",
            path,
            name = %extension.name,
            exports = extension.exports.borrow().len(),
            "extension loaded"
        );

        self.modules.borrow_mut().push(module);
        self.loaded.borrow_mut().push(extension.clone());
        Ok(extension)
    }

    /// Every successful load, in order
    pub fn loaded(&self) -> Vec<LoadedExtension> {
        self.loaded.borrow().clone()
    }

    /// Number of library handles held, including failed loads
    pub fn library_count(&self) -> usize {
        self.libraries.borrow().len()
    }

    /// The script-facing `loadDll(path)` function.
    ///
    /// Each loaded extension is also attached to `builtin` under its name.
    pub fn into_function(self: Rc<Self>, builtin: ObjectRef) -> NativeFunction {
        NativeFunction::new("loadDll", move |_engine, args| {
            let path = match args.first() {
                Some(Value::String(path)) => path.clone(),
                Some(other) => {
                    return Err(HostError::type_error(format!(
                        "loadDll expects a string path, got {}",
                        other.type_name()
                    )))
                }
                None => return Err(HostError::type_error("loadDll expects a string path")),
            };
            let extension = self.load(&path)?;
            builtin
                .borrow_mut()
                .set(extension.name.clone(), Value::Object(extension.exports.clone()));
            Ok(Value::Object(extension.exports))
        })
    }
}

impl Drop for ExtensionRegistry {
    fn drop(&mut self) {
        for library in self.libraries.get_mut().drain(..) {
            std::mem::forget(library);
        }
    }
}

#[cfg(unix)]
fn open_library(path: &str) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_GLOBAL, RTLD_LAZY};
    // SAFETY: loading runs the library's initializers; extensions are trusted.
    unsafe { UnixLibrary::open(Some(path), RTLD_LAZY | RTLD_GLOBAL) }.map(Library::from)
}

#[cfg(not(unix))]
fn open_library(path: &str) -> Result<Library, libloading::Error> {
    // SAFETY: see the unix variant.
    unsafe { Library::new(path) }
}

fn default_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    struct Counter;

    impl NativeModule for Counter {
        fn name(&self) -> Option<&str> {
            Some("counter")
        }

        fn exports(&self) -> ObjectRef {
            Object::new().with("start", 1.0).into_ref()
        }
    }

    struct Anonymous;

    impl NativeModule for Anonymous {
        fn exports(&self) -> ObjectRef {
            Object::new().into_ref()
        }
    }

    fn counter_entry() -> Box<dyn NativeModule> {
        Box::new(Counter)
    }

    fn anonymous_entry() -> Box<dyn NativeModule> {
        Box::new(Anonymous)
    }

    fn panicking_entry() -> Box<dyn NativeModule> {
        panic!("extension init failed")
    }

    struct BadName;

    impl NativeModule for BadName {
        fn name(&self) -> Option<&str> {
            panic!("name lookup failed")
        }

        fn exports(&self) -> ObjectRef {
            Object::new().into_ref()
        }
    }

    fn bad_name_entry() -> Box<dyn NativeModule> {
        Box::new(BadName)
    }

    #[test]
    fn test_instantiate_records_extension() {
        let registry = ExtensionRegistry::new();
        let ext = registry.instantiate("/opt/libcounter.so", counter_entry).unwrap();
        assert_eq!(ext.name, "counter");
        assert_eq!(ext.exports.borrow().get("start"), Some(&Value::Number(1.0)));
        assert_eq!(registry.loaded().len(), 1);
    }

    #[test]
    fn test_default_name_is_file_stem() {
        let registry = ExtensionRegistry::new();
        let ext = registry.instantiate("/opt/libthing.so", anonymous_entry).unwrap();
        assert_eq!(ext.name, "libthing");
    }

    #[test]
    fn test_entry_panic_is_reported() {
        let registry = ExtensionRegistry::new();
        let err = registry.instantiate("/opt/libbad.so", panicking_entry).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::EntryPointPanicked);
        assert_eq!(err.diagnostic.as_deref(), Some("extension init failed"));
        assert!(registry.loaded().is_empty());
    }

    #[test]
    fn test_name_panic_is_reported() {
        let registry = ExtensionRegistry::new();
        let err = registry.instantiate("/opt/libbadname.so", bad_name_entry).unwrap_err();
        assert_eq!(err.kind, LoadErrorKind::EntryPointPanicked);
        assert_eq!(err.diagnostic.as_deref(), Some("name lookup failed"));
        assert!(registry.loaded().is_empty());
    }

    #[test]
    fn test_missing_library() {
        let registry = ExtensionRegistry::new();
        let err = registry.load("/nonexistent/libnope.so").unwrap_err();
        match err {
            HostError::Load(e) => {
                assert_eq!(e.kind, LoadErrorKind::LibraryNotFound);
                assert!(e.to_string().starts_with("Shared library not found /nonexistent/libnope.so"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(registry.library_count(), 0);
    }

    #[test]
    fn test_load_dll_requires_string() {
        let registry = Rc::new(ExtensionRegistry::new());
        let builtin = Object::new().into_ref();
        let load_dll = registry.into_function(builtin);
        struct NoEngine;
        impl crate::engine::ScriptEngine for NoEngine {
            fn compile(
                &mut self,
                _source: &str,
                origin: &crate::engine::ScriptOrigin,
            ) -> Result<crate::engine::CompiledScript, crate::error::CompileError> {
                Err(crate::error::CompileError::new(origin.name(), "unsupported"))
            }
            fn run(&mut self, _script: &crate::engine::CompiledScript) -> Result<Value, HostError> {
                Ok(Value::Undefined)
            }
            fn expose(&mut self, _name: &str, _value: Value) {}
        }
        let err = load_dll.call(&mut NoEngine, &[Value::Null]).unwrap_err();
        assert!(matches!(err, HostError::Type(_)));
        let err = load_dll.call(&mut NoEngine, &[]).unwrap_err();
        assert!(matches!(err, HostError::Type(_)));
    }
}
