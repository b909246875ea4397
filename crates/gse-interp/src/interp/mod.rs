// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The interpreter implementation.
//!
//! A tree-walk interpreter over [`gse_ast::Program`]. Scripts run against a
//! host-supplied [`Context`]; top-level `let` bindings land there, so the
//! host can read them back after execution.

use std::cell::Cell;

mod assign;
mod call;
mod eval_expr;
mod exec_scope;
mod operators;

use gse_ast::{OperatorKind, Program, Span};

use crate::config::InterpreterConfig;
use crate::context::Context;
use crate::value::Value;

/// How a scope finished.
#[derive(Debug)]
pub(crate) enum Flow {
    Completed,
    Returning(Value),
}

/// The tree-walk interpreter.
///
/// Holds no script state of its own; all bindings live in the [`Context`]
/// passed to [`Interpreter::execute`]. One interpreter can run any number
/// of scripts.
pub struct Interpreter {
    config: InterpreterConfig,
    /// Script function calls currently on the stack.
    depth: Cell<usize>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self { config, depth: Cell::new(0) }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Run a program in `ctx`.
    ///
    /// Yields the value of a top-level `return`, or `undefined` if the
    /// program runs off the end.
    pub fn execute(&self, ctx: &Context, program: &Program) -> Result<Value, RuntimeDiagnostic> {
        tracing::debug!(statements = program.body.body.len(), "executing program");
        match self.execute_scope(ctx, &program.body)? {
            Flow::Returning(value) => Ok(value),
            Flow::Completed => Ok(Value::Undefined),
        }
    }

    /// Call a script function or native from the host.
    pub fn call(&self, callable: &Value, args: Vec<Value>) -> Result<Value, RuntimeDiagnostic> {
        let callable = callable.deref().map_err(|e| RuntimeDiagnostic::new(e, Span::default()))?;
        self.invoke(&callable, args, Span::default())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// A runtime error.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("variable `{0}` is already defined in this scope")]
    AlreadyDefined(String),

    #[error("{0}")]
    TypeError(String),

    #[error("operator `{op}` cannot combine {left} and {right}")]
    TypeMismatch { op: OperatorKind, left: &'static str, right: &'static str },

    #[error("division by zero; check divisor before dividing")]
    DivisionByZero,

    #[error("integer overflow in `{0}`")]
    IntegerOverflow(OperatorKind),

    #[error("expected {expected} argument{}, got {got}", if *.expected == 1 { "" } else { "s" })]
    ArityMismatch { expected: usize, got: usize },

    #[error("{0} is not callable")]
    NotCallable(&'static str),

    #[error("cannot read property `{key}` of {found}")]
    NotAnObject { key: String, found: &'static str },

    #[error("property `{key}` refers to an object that no longer exists")]
    DanglingReference { key: String },

    #[error("invalid assignment target; assign to a variable or a property")]
    InvalidAssignmentTarget,

    #[error("`return` is only allowed as a statement")]
    ReturnNotAllowed,

    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    #[error("call depth limit of {limit} exceeded")]
    CallDepthExceeded { limit: usize },

    /// Raised by host natives.
    #[error("{0}")]
    Host(String),
}

impl RuntimeError {
    pub fn host(message: impl Into<String>) -> Self {
        RuntimeError::Host(message.into())
    }
}

/// Runtime error with source location for diagnostic display.
#[derive(Debug)]
pub struct RuntimeDiagnostic {
    pub error: RuntimeError,
    pub span: Span,
}

impl RuntimeDiagnostic {
    pub fn new(error: RuntimeError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for RuntimeDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for RuntimeDiagnostic {}
