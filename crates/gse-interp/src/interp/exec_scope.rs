// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement and scope execution.

use gse_ast::{Operand, OperatorKind, Scope, Statement};

use super::{Flow, Interpreter, RuntimeDiagnostic, RuntimeError};
use crate::context::Context;
use crate::stack::ensure_sufficient_stack;

impl Interpreter {
    /// Run statements in order in `ctx`, stopping at the first `return`.
    pub(crate) fn execute_scope(&self, ctx: &Context, scope: &Scope) -> Result<Flow, RuntimeDiagnostic> {
        ensure_sufficient_stack(|| -> Result<Flow, RuntimeDiagnostic> {
            for stmt in &scope.body {
                if let Flow::Returning(value) = self.execute_statement(ctx, stmt)? {
                    return Ok(Flow::Returning(value));
                }
            }
            Ok(Flow::Completed)
        })
    }

    fn execute_statement(&self, ctx: &Context, stmt: &Statement) -> Result<Flow, RuntimeDiagnostic> {
        let expr = &stmt.body;
        tracing::trace!(start = stmt.span.start, "statement");
        match (expr.operator(), expr.a.as_deref(), expr.b.as_deref()) {
            (Some(OperatorKind::Return), None, Some(operand)) => {
                let value = self
                    .evaluate_operand(ctx, operand, expr.span)?
                    .deref()
                    .map_err(|e| RuntimeDiagnostic::new(e, expr.span))?;
                Ok(Flow::Returning(value))
            }
            // A block statement: its `return` leaves the enclosing function.
            (None, Some(Operand::Scope(block)), None) => self.execute_block(ctx, block),
            _ => {
                self.evaluate_expression(ctx, expr)?;
                Ok(Flow::Completed)
            }
        }
    }

    pub(crate) fn execute_block(&self, ctx: &Context, block: &Scope) -> Result<Flow, RuntimeDiagnostic> {
        let inner = ctx.push_scope();
        tracing::trace!(depth = inner.depth(), "enter scope");
        let flow = self.execute_scope(&inner, block);
        inner.pop_scope();
        flow
    }

    /// A block used as a value evaluates to `undefined`; it has no
    /// enclosing function to return from.
    pub(crate) fn evaluate_block(&self, ctx: &Context, block: &Scope) -> Result<(), RuntimeDiagnostic> {
        match self.execute_block(ctx, block)? {
            Flow::Completed => Ok(()),
            Flow::Returning(_) => Err(RuntimeDiagnostic::new(RuntimeError::ReturnNotAllowed, block.span)),
        }
    }
}
