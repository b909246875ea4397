// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values.
//!
//! Scalars are copied. Objects and callables are shared: cloning a
//! [`Value::Object`] clones the handle, not the mapping, so a write through
//! one alias is seen through every other.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use gse_ast::Literal;

use crate::context::Context;
use crate::interp::RuntimeError;
use crate::native::Native;

/// A runtime value in the interpreter.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Rc<str>),
    Object(Object),
    /// A property slot produced by `parent.key`; see [`ObjectRef`].
    ObjectRef(ObjectRef),
    Callable(Callable),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::ObjectRef(_) => "reference",
            Value::Callable(_) => "callable",
        }
    }

    /// Resolve a property reference to the value currently stored at its key.
    /// Any other value is returned unchanged.
    pub fn deref(&self) -> Result<Value, RuntimeError> {
        match self {
            Value::ObjectRef(r) => r.get(),
            other => Ok(other.clone()),
        }
    }

    /// Equality as `==` sees it: natural for scalars, identity for objects
    /// and callables, `false` across types.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::ObjectRef(a), Value::ObjectRef(b)) => a.same_slot(b),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Wrap a host closure as a callable value.
    pub fn native<F>(f: F) -> Value
    where
        F: Fn(&crate::native::CallSite, Vec<Value>) -> Result<Value, RuntimeError> + 'static,
    {
        Value::Callable(Callable::Native(Native::new(f)))
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<*const ()>, quoted: bool) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::String(s) if quoted => write!(f, "{:?}", s),
            Value::String(s) => write!(f, "{}", s),
            Value::Object(o) => o.fmt_nested(f, open),
            Value::ObjectRef(r) => match r.get() {
                Ok(v) => v.fmt_nested(f, open, quoted),
                Err(_) => write!(f, "[dangling .{}]", r.key()),
            },
            Value::Callable(Callable::Function(_)) => write!(f, "[function]"),
            Value::Callable(Callable::Native(_)) => write!(f, "[native]"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, &mut Vec::new(), false)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(_) => self.fmt_nested(f, &mut Vec::new(), true),
            Value::ObjectRef(r) => write!(f, "ObjectRef(.{})", r.key()),
            other => write!(f, "{}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Undefined => Value::Undefined,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(n) => Value::Float(*n),
            Literal::String(s) => Value::String(Rc::from(s.as_str())),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
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

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

// =============================================================================
// Objects
// =============================================================================

type Properties = RefCell<IndexMap<String, Value>>;

/// Shared, insertion-ordered property map.
#[derive(Clone, Default)]
pub struct Object(Rc<Properties>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Last write wins; a new key goes to the end.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.0.borrow_mut().insert(key.into(), value);
    }

    /// A non-owning reference to `key`. The key need not exist yet.
    pub fn get_ref(&self, key: &str) -> ObjectRef {
        ObjectRef { target: Rc::downgrade(&self.0), key: Rc::from(key), anchor: None }
    }

    /// Like [`Object::get_ref`], but the reference keeps this object alive.
    /// Used for temporaries that nothing else holds, e.g. `{ x: 1 }.x`.
    pub(crate) fn anchored_ref(&self, key: &str) -> ObjectRef {
        ObjectRef { anchor: Some(self.clone()), ..self.get_ref(key) }
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    /// Remove and return every property.
    pub(crate) fn drain(&self) -> Vec<Value> {
        self.0.borrow_mut().drain(..).map(|(_, v)| v).collect()
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<*const ()>) -> fmt::Result {
        if open.contains(&self.addr()) {
            return write!(f, "{{...}}");
        }
        let entries = self.entries();
        if entries.is_empty() {
            return write!(f, "{{}}");
        }
        open.push(self.addr());
        write!(f, "{{ ")?;
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: ", key)?;
            value.fmt_nested(f, open, true)?;
        }
        open.pop();
        write!(f, " }}")
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, &mut Vec::new())
    }
}

/// A `(object, key)` pair produced by property access.
///
/// Reads are live: [`ObjectRef::get`] returns whatever the key holds now.
/// The object is held weakly unless the reference was built from a
/// temporary, so a reference can outlive its object; using it then is
/// [`RuntimeError::DanglingReference`].
#[derive(Clone)]
pub struct ObjectRef {
    target: Weak<Properties>,
    key: Rc<str>,
    anchor: Option<Object>,
}

impl ObjectRef {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn object(&self) -> Result<Object, RuntimeError> {
        self.target
            .upgrade()
            .map(Object)
            .ok_or_else(|| RuntimeError::DanglingReference { key: self.key.to_string() })
    }

    /// Current value at the key; a missing key reads as `undefined`.
    pub fn get(&self) -> Result<Value, RuntimeError> {
        Ok(self.object()?.get(&self.key).unwrap_or(Value::Undefined))
    }

    pub fn set(&self, value: Value) -> Result<(), RuntimeError> {
        self.object()?.set(self.key.to_string(), value);
        Ok(())
    }

    pub fn is_dangling(&self) -> bool {
        self.target.strong_count() == 0
    }

    pub(crate) fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }

    pub(crate) fn take_anchor(self) -> Option<Object> {
        self.anchor
    }

    fn same_slot(&self, other: &ObjectRef) -> bool {
        self.target.ptr_eq(&other.target) && self.key == other.key
    }
}

// =============================================================================
// Callables
// =============================================================================

/// Something a script can call.
#[derive(Clone)]
pub enum Callable {
    Function(Rc<Function>),
    Native(Native),
}

impl Callable {
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
            (Callable::Native(a), Callable::Native(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// A closure: parameters, body, and the scope it was defined in.
pub struct Function {
    pub parameters: Vec<String>,
    pub body: Rc<gse_ast::Scope>,
    /// Defining scope. Every call gets a fresh child of this context.
    pub context: Context,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.parameters.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_share_storage() {
        let a = Object::new();
        let b = a.clone();
        b.set("x", Value::Int(1));
        assert_eq!(a.get("x"), Some(Value::Int(1)));
        assert!(Value::Object(a).equals(&Value::Object(b)));
    }

    #[test]
    fn distinct_objects_are_unequal() {
        let a = Value::Object(Object::new());
        let b = Value::Object(Object::new());
        assert!(!a.equals(&b));
    }

    #[test]
    fn reference_reads_are_live() {
        let obj = Object::new();
        let r = obj.get_ref("n");
        assert_eq!(r.get().ok(), Some(Value::Undefined));
        obj.set("n", Value::Int(3));
        assert_eq!(Value::ObjectRef(r.clone()).deref().ok(), Some(Value::Int(3)));
        r.set(Value::Int(4)).expect("object is alive");
        assert_eq!(obj.get("n"), Some(Value::Int(4)));
    }

    #[test]
    fn reference_outliving_object_dangles() {
        let r = {
            let obj = Object::new();
            obj.set("k", Value::Bool(true));
            obj.get_ref("k")
        };
        assert!(r.is_dangling());
        assert!(matches!(r.get(), Err(RuntimeError::DanglingReference { ref key }) if key == "k"));
    }

    #[test]
    fn anchored_reference_keeps_temporary_alive() {
        let r = {
            let obj = Object::new();
            obj.set("k", Value::Int(9));
            obj.anchored_ref("k")
        };
        assert!(!r.is_dangling());
        assert_eq!(r.get().ok(), Some(Value::Int(9)));
    }

    #[test]
    fn equality_across_types_is_false() {
        assert!(!Value::Int(1).equals(&Value::Float(1.0)));
        assert!(!Value::from("1").equals(&Value::Int(1)));
        assert!(Value::Undefined.equals(&Value::Undefined));
    }

    #[test]
    fn display() {
        let inner = Object::new();
        inner.set("s", Value::from("hi"));
        let outer = Object::new();
        outer.set("n", Value::Int(1));
        outer.set("f", Value::Float(2.0));
        outer.set("inner", Value::Object(inner));
        outer.set("empty", Value::Object(Object::new()));

        assert_eq!(Value::from("raw").to_string(), "raw");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(
            Value::Object(outer).to_string(),
            r#"{ n: 1, f: 2.0, inner: { s: "hi" }, empty: {} }"#
        );
    }

    #[test]
    fn display_survives_cycles() {
        let obj = Object::new();
        obj.set("me", Value::Object(obj.clone()));
        assert_eq!(Value::Object(obj.clone()).to_string(), "{ me: {...} }");
        obj.drain();
    }
}
