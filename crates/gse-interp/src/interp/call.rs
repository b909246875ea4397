// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function calling.

use std::cell::Cell;

use gse_ast::Span;

use crate::native::CallSite;
use crate::value::{Callable, Function, Value};

use super::{Flow, Interpreter, RuntimeDiagnostic, RuntimeError};

/// Decrements the call depth when a call frame unwinds, error or not.
struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

impl Interpreter {
    /// Call an already-dereferenced value with already-dereferenced arguments.
    pub(crate) fn invoke(&self, callable: &Value, args: Vec<Value>, span: Span) -> Result<Value, RuntimeDiagnostic> {
        match callable {
            Value::Callable(Callable::Function(func)) => self.call_function(func, args, span),
            Value::Callable(Callable::Native(native)) => {
                tracing::debug!(args = args.len(), "calling native");
                native
                    .invoke(&CallSite { span }, args)
                    .map_err(|e| RuntimeDiagnostic::new(e, span))
            }
            other => Err(RuntimeDiagnostic::new(RuntimeError::NotCallable(other.type_name()), span)),
        }
    }

    fn call_function(&self, func: &Function, args: Vec<Value>, span: Span) -> Result<Value, RuntimeDiagnostic> {
        let limit = self.config.max_call_depth;
        let depth = self.depth.get();
        if depth >= limit {
            tracing::warn!(limit, "call depth limit reached");
            return Err(RuntimeDiagnostic::new(RuntimeError::CallDepthExceeded { limit }, span));
        }

        let scope = func
            .context
            .create_function_scope(&func.parameters, args)
            .map_err(|e| RuntimeDiagnostic::new(e, span))?;

        self.depth.set(depth + 1);
        let _guard = DepthGuard(&self.depth);
        tracing::debug!(depth = depth + 1, params = func.parameters.len(), "calling function");

        match self.execute_scope(&scope, &func.body)? {
            Flow::Returning(value) => Ok(value),
            Flow::Completed => Ok(Value::Undefined),
        }
    }
}
