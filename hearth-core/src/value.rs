//! Script-visible values shared between the host and the engine.
//!
//! The engine owns its own internal representation; these are the values
//! that cross the host boundary: arguments to host functions, their results,
//! and the objects the global scope and native extensions expose.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::engine::ScriptEngine;
use crate::error::HostError;

/// Shared, mutable handle to an object
pub type ObjectRef = Rc<RefCell<Object>>;

/// Signature of a host function callable from script code.
///
/// The engine passes itself in so that host functions such as `include`
/// can compile and run further scripts in the caller's scope.
pub type HostFn = dyn Fn(&mut dyn ScriptEngine, &[Value]) -> Result<Value, HostError>;

/// A property bag with deterministic (sorted) key order
#[derive(Debug, Default)]
pub struct Object {
    properties: BTreeMap<String, Value>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a shared handle
    pub fn into_ref(self) -> ObjectRef {
        Rc::new(RefCell::new(self))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Set a property, returning the previous value if any
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Property names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Builder-style setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder-style function registration
    pub fn with_function<F>(self, name: &str, func: F) -> Self
    where
        F: Fn(&mut dyn ScriptEngine, &[Value]) -> Result<Value, HostError> + 'static,
    {
        let function = NativeFunction::new(name, func);
        self.with(name, function)
    }
}

/// A host-implemented function value
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: Rc<HostFn>,
}

impl NativeFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&mut dyn ScriptEngine, &[Value]) -> Result<Value, HostError> + 'static,
    {
        Self {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function on behalf of `engine`
    pub fn call(&self, engine: &mut dyn ScriptEngine, args: &[Value]) -> Result<Value, HostError> {
        (self.func)(engine, args)
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.func, &b.func)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// A value crossing the host/engine boundary
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Object(ObjectRef),
    Function(NativeFunction),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&NativeFunction> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// JSON rendering, used by diagnostics
    ///
    /// Functions render as `"[function name]"`; non-finite numbers as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::Object(o) => {
                let map = o
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect();
                serde_json::Value::Object(map)
            }
            Value::Function(f) => serde_json::Value::String(format!("[function {}]", f.name())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Value::Undefined"),
            Value::Null => write!(f, "Value::Null"),
            Value::Bool(b) => write!(f, "Value::Bool({})", b),
            Value::Number(n) => write!(f, "Value::Number({})", n),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::Object(o) => match o.try_borrow() {
                Ok(obj) => f.debug_set().entries(obj.keys()).finish(),
                Err(_) => write!(f, "Value::Object(<borrowed>)"),
            },
            Value::Function(func) => write!(f, "Value::Function({})", func.name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => NativeFunction::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o.into_ref())
    }
}

impl From<NativeFunction> for Value {
    fn from(f: NativeFunction) -> Self {
        Value::Function(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_numbers() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_display_misc() {
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::from(Object::new()).to_string(), "[object Object]");
    }

    #[test]
    fn test_object_keys_sorted() {
        let obj = Object::new().with("zeta", 1.0).with("alpha", 2.0).with("mid", true);
        let keys: Vec<&str> = obj.keys().collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_object_identity_equality() {
        let a = Object::new().into_ref();
        let b = Object::new().into_ref();
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn test_to_json() {
        let obj = Object::new()
            .with("name", "sample")
            .with("version", 2.0)
            .with_function("hello", |_, _| Ok(Value::Undefined));
        let json = Value::from(obj).to_json();
        assert_eq!(json["name"], "sample");
        assert_eq!(json["version"], 2.0);
        assert_eq!(json["hello"], "[function hello]");
    }
}
