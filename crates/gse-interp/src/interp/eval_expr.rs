// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression evaluation.

use std::rc::Rc;

use gse_ast::{Expression, Operand, OperatorKind, Span, VariableHint};

use super::{Interpreter, RuntimeDiagnostic, RuntimeError};
use crate::context::Context;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Callable, Function, Object, ObjectRef, Value};

impl Interpreter {
    /// Evaluate an expression to a value.
    ///
    /// Property access yields a [`Value::ObjectRef`]; callers that need the
    /// stored value dereference it.
    pub(crate) fn evaluate_expression(&self, ctx: &Context, expr: &Expression) -> Result<Value, RuntimeDiagnostic> {
        ensure_sufficient_stack(|| self.evaluate_expression_inner(ctx, expr))
    }

    fn evaluate_expression_inner(&self, ctx: &Context, expr: &Expression) -> Result<Value, RuntimeDiagnostic> {
        let diag = |e| RuntimeDiagnostic::new(e, expr.span);
        expr.check_shape().map_err(|m| diag(RuntimeError::MalformedExpression(m)))?;

        let Some(kind) = expr.operator() else {
            return match expr.a.as_deref() {
                Some(a) => self.evaluate_operand(ctx, a, expr.span),
                None => Err(diag(RuntimeError::MalformedExpression("expression is empty".into()))),
            };
        };

        match kind {
            OperatorKind::Return => Err(diag(RuntimeError::ReturnNotAllowed)),
            OperatorKind::Assign => self.assign(ctx, expr),
            OperatorKind::Inc | OperatorKind::Dec => self.increment(ctx, expr, kind),
            OperatorKind::Child => self.property_ref(ctx, expr).map(Value::ObjectRef),
            _ if kind.compound_base().is_some() => self.compound_assign(ctx, expr, kind),
            OperatorKind::Not => {
                let b = self.operand_value(ctx, expr.b.as_deref(), expr.span)?;
                match b {
                    Value::Bool(v) => Ok(Value::Bool(!v)),
                    other => Err(diag(RuntimeError::TypeError(format!(
                        "operator `!` needs a bool, found {}",
                        other.type_name()
                    )))),
                }
            }
            _ => {
                let a = self.operand_value(ctx, expr.a.as_deref(), expr.span)?;
                let b = self.operand_value(ctx, expr.b.as_deref(), expr.span)?;
                Self::eval_binop(kind, &a, &b).map_err(diag)
            }
        }
    }

    /// Evaluate an operand slot and dereference the result.
    pub(crate) fn operand_value(
        &self,
        ctx: &Context,
        operand: Option<&Operand>,
        span: Span,
    ) -> Result<Value, RuntimeDiagnostic> {
        let operand = operand.ok_or_else(|| {
            RuntimeDiagnostic::new(RuntimeError::MalformedExpression("missing operand".into()), span)
        })?;
        self.evaluate_operand(ctx, operand, span)?
            .deref()
            .map_err(|e| RuntimeDiagnostic::new(e, span))
    }

    pub(crate) fn evaluate_operand(&self, ctx: &Context, operand: &Operand, span: Span) -> Result<Value, RuntimeDiagnostic> {
        match operand {
            Operand::Value(lit) => Ok(Value::from(lit)),
            Operand::Variable(var) => {
                if var.hint == VariableHint::Create {
                    return Err(RuntimeDiagnostic::new(
                        RuntimeError::MalformedExpression(format!("declaration of `{}` used as a value", var.name)),
                        var.span,
                    ));
                }
                ctx.get_variable(&var.name).map_err(|e| RuntimeDiagnostic::new(e, var.span))
            }
            Operand::Object(lit) => {
                let obj = Object::new();
                for (key, value_expr) in &lit.properties {
                    let value = self
                        .evaluate_expression(ctx, value_expr)?
                        .deref()
                        .map_err(|e| RuntimeDiagnostic::new(e, value_expr.span))?;
                    obj.set(key.clone(), value);
                }
                Ok(Value::Object(obj))
            }
            Operand::Scope(block) => {
                self.evaluate_block(ctx, block)?;
                Ok(Value::Undefined)
            }
            Operand::Expression(inner) => self.evaluate_expression(ctx, inner),
            Operand::Function(lit) => Ok(Value::Callable(Callable::Function(Rc::new(Function {
                parameters: lit.parameters.clone(),
                body: Rc::clone(&lit.body),
                context: ctx.clone(),
            })))),
            Operand::Call(call) => {
                let callable = self
                    .evaluate_expression(ctx, &call.callable)?
                    .deref()
                    .map_err(|e| RuntimeDiagnostic::new(e, call.callable.span))?;
                let mut args = Vec::with_capacity(call.arguments.len());
                for arg in &call.arguments {
                    let value = self
                        .evaluate_expression(ctx, arg)?
                        .deref()
                        .map_err(|e| RuntimeDiagnostic::new(e, arg.span))?;
                    args.push(value);
                }
                self.invoke(&callable, args, span)
            }
        }
    }

    /// Resolve `parent.key` to a reference.
    ///
    /// A parent reached through a variable is owned by that binding, so the
    /// reference holds it weakly. A parent produced on the spot (an object
    /// literal, a call result) has no other owner and is anchored in the
    /// reference instead.
    pub(crate) fn property_ref(&self, ctx: &Context, expr: &Expression) -> Result<ObjectRef, RuntimeDiagnostic> {
        let diag = |e| RuntimeDiagnostic::new(e, expr.span);
        let key = match expr.b.as_deref() {
            Some(Operand::Variable(v)) if v.hint == VariableHint::None => v.name.as_str(),
            other => {
                return Err(diag(RuntimeError::MalformedExpression(format!(
                    "property name must be a name, found {}",
                    other.map_or("nothing", Operand::kind_name)
                ))))
            }
        };
        let parent_operand = expr
            .a
            .as_deref()
            .ok_or_else(|| diag(RuntimeError::MalformedExpression("missing object".into())))?;

        let parent = self.evaluate_operand(ctx, parent_operand, expr.span)?;
        let anchored = match (&parent, parent_operand) {
            (_, Operand::Variable(_)) => false,
            (Value::ObjectRef(r), _) => r.is_anchored(),
            _ => true,
        };

        match parent.deref().map_err(diag)? {
            Value::Object(obj) if anchored => Ok(obj.anchored_ref(key)),
            Value::Object(obj) => Ok(obj.get_ref(key)),
            other => Err(diag(RuntimeError::NotAnObject { key: key.to_string(), found: other.type_name() })),
        }
    }
}
