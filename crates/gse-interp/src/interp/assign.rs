// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Assignment, compound assignment and `++`/`--`.

use gse_ast::{Expression, Operand, OperatorKind, VariableHint};

use crate::context::Context;
use crate::value::{ObjectRef, Value};

use super::{Interpreter, RuntimeDiagnostic, RuntimeError};

/// Where a write lands.
enum Target<'a> {
    Declare(&'a str),
    Variable(&'a str),
    Property(ObjectRef),
}

impl Interpreter {
    /// `a = b`. The right side is evaluated first and stored dereferenced;
    /// the expression yields the stored value.
    pub(super) fn assign(&self, ctx: &Context, expr: &Expression) -> Result<Value, RuntimeDiagnostic> {
        let value = self.operand_value(ctx, expr.b.as_deref(), expr.span)?;
        let target = self.resolve_target(ctx, expr, true)?;
        self.write(ctx, target, value.clone())
            .map_err(|e| RuntimeDiagnostic::new(e, expr.span))?;
        Ok(value)
    }

    /// `a op= b`, i.e. `a = a op b` with `a` resolved once.
    pub(super) fn compound_assign(
        &self,
        ctx: &Context,
        expr: &Expression,
        kind: OperatorKind,
    ) -> Result<Value, RuntimeDiagnostic> {
        let diag = |e| RuntimeDiagnostic::new(e, expr.span);
        let base = kind
            .compound_base()
            .ok_or_else(|| diag(RuntimeError::MalformedExpression(format!("`{}` is not a compound operator", kind))))?;

        let rhs = self.operand_value(ctx, expr.b.as_deref(), expr.span)?;
        let target = self.resolve_target(ctx, expr, false)?;
        let current = self.read(ctx, &target).map_err(diag)?;
        let updated = Self::eval_binop(base, &current, &rhs).map_err(diag)?;
        self.write(ctx, target, updated.clone()).map_err(diag)?;
        Ok(updated)
    }

    /// `++`/`--` on an integer variable. Prefix yields the new value,
    /// postfix the old.
    pub(super) fn increment(&self, ctx: &Context, expr: &Expression, kind: OperatorKind) -> Result<Value, RuntimeDiagnostic> {
        let diag = |e| RuntimeDiagnostic::new(e, expr.span);
        let prefix = expr.a.is_none();
        let target = match self.resolve_target(ctx, expr, false)? {
            Target::Property(r) => {
                return Err(diag(RuntimeError::TypeError(format!(
                    "operator `{}` needs an integer variable, found property `{}`",
                    kind,
                    r.key()
                ))))
            }
            target => target,
        };

        let old = match self.read(ctx, &target).map_err(diag)? {
            Value::Int(n) => n,
            other => {
                return Err(diag(RuntimeError::TypeError(format!(
                    "operator `{}` needs an int, found {}",
                    kind,
                    other.type_name()
                ))))
            }
        };
        let new = match kind {
            OperatorKind::Inc => old.checked_add(1),
            _ => old.checked_sub(1),
        }
        .ok_or_else(|| diag(RuntimeError::IntegerOverflow(kind)))?;

        self.write(ctx, target, Value::Int(new)).map_err(diag)?;
        Ok(Value::Int(if prefix { new } else { old }))
    }

    /// Find the target operand of an assignment-like expression: `a` for
    /// binary and postfix forms, `b` for prefix.
    fn resolve_target<'e>(
        &self,
        ctx: &Context,
        expr: &'e Expression,
        allow_declare: bool,
    ) -> Result<Target<'e>, RuntimeDiagnostic> {
        let invalid = || RuntimeDiagnostic::new(RuntimeError::InvalidAssignmentTarget, expr.span);
        let operand = expr.a.as_deref().or(expr.b.as_deref()).ok_or_else(invalid)?;

        match operand {
            Operand::Variable(var) => match var.hint {
                VariableHint::Create if allow_declare => Ok(Target::Declare(&var.name)),
                VariableHint::Create => Err(invalid()),
                VariableHint::None => Ok(Target::Variable(&var.name)),
            },
            Operand::Expression(inner) if inner.operator() == Some(OperatorKind::Child) => {
                Ok(Target::Property(self.property_ref(ctx, inner)?))
            }
            _ => Err(invalid()),
        }
    }

    fn read(&self, ctx: &Context, target: &Target<'_>) -> Result<Value, RuntimeError> {
        match target {
            Target::Declare(name) => Err(RuntimeError::UndefinedVariable(name.to_string())),
            Target::Variable(name) => ctx.get_variable(name)?.deref(),
            Target::Property(r) => r.get(),
        }
    }

    fn write(&self, ctx: &Context, target: Target<'_>, value: Value) -> Result<(), RuntimeError> {
        match target {
            Target::Declare(name) => ctx.create_variable(name, value),
            Target::Variable(name) => ctx.update_variable(name, value),
            Target::Property(r) => r.set(value),
        }
    }
}
