//! Sample native extension
//!
//! Build as a `cdylib` and load it from a script:
//!
//! ```text
//! set sample loadDll "target/debug/libhearth_ext_sample.so"
//! call sample.greet "world"
//! ```

use std::cell::Cell;

use hearth_core::{declare_extension, HostError, NativeModule, Object, ObjectRef, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Greeting and counter helpers
#[derive(Default)]
pub struct SampleModule;

impl NativeModule for SampleModule {
    fn name(&self) -> Option<&str> {
        Some("sample")
    }

    fn exports(&self) -> ObjectRef {
        let calls = Cell::new(0u32);

        Object::new()
            .with("version", VERSION)
            .with_function("greet", |_, args| {
                let who = args.first().and_then(Value::as_str).unwrap_or("stranger");
                Ok(Value::from(format!("hello, {}", who)))
            })
            .with_function("add", |_, args| {
                let mut sum = 0.0;
                for arg in args {
                    sum += arg.as_number().ok_or_else(|| {
                        HostError::type_error(format!("add expects numbers, got {}", arg.type_name()))
                    })?;
                }
                Ok(Value::Number(sum))
            })
            .with_function("tick", move |_, _| {
                calls.set(calls.get() + 1);
                Ok(Value::Number(f64::from(calls.get())))
            })
            .into_ref()
    }
}

declare_extension!(SampleModule);
