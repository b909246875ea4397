// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexical scopes.
//!
//! A [`Context`] is one scope: its own bindings plus a link to the scope it
//! was pushed from. Contexts are reference counted because closures keep
//! their defining scope alive after the block that created it has finished.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::interp::RuntimeError;
use crate::value::{Callable, Value};

struct Frame {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Context>,
    depth: usize,
}

/// Handle to a scope. Cloning shares the scope.
#[derive(Clone)]
pub struct Context(Rc<Frame>);

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// A root scope with no parent.
    pub fn new() -> Self {
        Context(Rc::new(Frame { bindings: RefCell::default(), parent: None, depth: 0 }))
    }

    /// Bind `name` in this scope. Shadowing an outer binding is fine;
    /// declaring the same name twice in one scope is not.
    pub fn create_variable(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let mut bindings = self.0.bindings.borrow_mut();
        if bindings.contains_key(name) {
            return Err(RuntimeError::AlreadyDefined(name.to_string()));
        }
        bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// Overwrite the nearest binding of `name`.
    pub fn update_variable(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let mut scope = Some(self);
        while let Some(ctx) = scope {
            if let Some(slot) = ctx.0.bindings.borrow_mut().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            scope = ctx.0.parent.as_ref();
        }
        Err(RuntimeError::UndefinedVariable(name.to_string()))
    }

    pub fn get_variable(&self, name: &str) -> Result<Value, RuntimeError> {
        let mut scope = Some(self);
        while let Some(ctx) = scope {
            if let Some(value) = ctx.0.bindings.borrow().get(name) {
                return Ok(value.clone());
            }
            scope = ctx.0.parent.as_ref();
        }
        Err(RuntimeError::UndefinedVariable(name.to_string()))
    }

    /// Whether `name` is bound in this scope, ignoring parents.
    pub fn has_local(&self, name: &str) -> bool {
        self.0.bindings.borrow().contains_key(name)
    }

    pub fn push_scope(&self) -> Context {
        Context(Rc::new(Frame {
            bindings: RefCell::default(),
            parent: Some(self.clone()),
            depth: self.0.depth + 1,
        }))
    }

    /// Leave this scope, returning the one it was pushed from.
    pub fn pop_scope(self) -> Option<Context> {
        self.0.parent.clone()
    }

    /// A fresh child scope with each parameter bound to its argument.
    pub fn create_function_scope(&self, parameters: &[String], args: Vec<Value>) -> Result<Context, RuntimeError> {
        if parameters.len() != args.len() {
            return Err(RuntimeError::ArityMismatch { expected: parameters.len(), got: args.len() });
        }
        let scope = self.push_scope();
        for (name, value) in parameters.iter().zip(args) {
            scope.create_variable(name, value)?;
        }
        Ok(scope)
    }

    /// Expose a host function to scripts under `name`.
    pub fn register_native<F>(&self, name: &str, f: F) -> Result<(), RuntimeError>
    where
        F: Fn(&crate::native::CallSite, Vec<Value>) -> Result<Value, RuntimeError> + 'static,
    {
        self.create_variable(name, Value::native(f))
    }

    /// Nesting depth; a root scope is 0.
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    pub fn ptr_eq(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    fn drain(&self) -> Vec<Value> {
        self.0.bindings.borrow_mut().drain().map(|(_, v)| v).collect()
    }

    /// Clear every scope and object reachable from this context.
    ///
    /// A closure stored in the scope it captured forms a reference cycle
    /// that counting alone never frees. Call this when a script is
    /// discarded; the context and anything reached from it are left empty.
    pub fn teardown(&self) {
        let mut seen: HashSet<*const ()> = HashSet::new();
        let mut scopes = vec![self.clone()];
        let mut pending: Vec<Value> = Vec::new();

        loop {
            if let Some(ctx) = scopes.pop() {
                if seen.insert(ctx.addr()) {
                    pending.extend(ctx.drain());
                    if let Some(parent) = &ctx.0.parent {
                        scopes.push(parent.clone());
                    }
                }
                continue;
            }
            let Some(value) = pending.pop() else { break };
            match value {
                Value::Object(obj) => {
                    if seen.insert(obj.addr()) {
                        pending.extend(obj.drain());
                    }
                }
                Value::ObjectRef(r) => {
                    if let Some(anchor) = r.take_anchor() {
                        pending.push(Value::Object(anchor));
                    }
                }
                Value::Callable(Callable::Function(f)) => scopes.push(f.context.clone()),
                _ => {}
            }
        }
        tracing::trace!(cleared = seen.len(), "context torn down");
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.0.bindings.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("Context").field("depth", &self.0.depth).field("bindings", &names).finish()
    }
}
