// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Binary operators.
//!
//! Operands are never coerced: arithmetic and comparison want two values of
//! the same type. `==`/`!=` accept anything and compare across types as
//! unequal.

use gse_ast::OperatorKind;

use crate::value::Value;

use super::{Interpreter, RuntimeError};

impl Interpreter {
    /// Apply a binary operator to two dereferenced values.
    pub(crate) fn eval_binop(op: OperatorKind, l: &Value, r: &Value) -> Result<Value, RuntimeError> {
        use OperatorKind::*;
        let overflow = || RuntimeError::IntegerOverflow(op);

        match (op, l, r) {
            (Eq, _, _) => Ok(Value::Bool(l.equals(r))),
            (Ne, _, _) => Ok(Value::Bool(!l.equals(r))),

            (Add, Value::Int(a), Value::Int(b)) => a.checked_add(*b).map(Value::Int).ok_or_else(overflow),
            (Sub, Value::Int(a), Value::Int(b)) => a.checked_sub(*b).map(Value::Int).ok_or_else(overflow),
            (Mul, Value::Int(a), Value::Int(b)) => a.checked_mul(*b).map(Value::Int).ok_or_else(overflow),
            (Div, Value::Int(_), Value::Int(0)) | (Mod, Value::Int(_), Value::Int(0)) => {
                Err(RuntimeError::DivisionByZero)
            }
            (Div, Value::Int(a), Value::Int(b)) => a.checked_div(*b).map(Value::Int).ok_or_else(overflow),
            (Mod, Value::Int(a), Value::Int(b)) => a.checked_rem(*b).map(Value::Int).ok_or_else(overflow),

            (Add, Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
            (Sub, Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
            (Mul, Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
            (Div, Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),

            (Add, Value::String(a), Value::String(b)) => Ok(Value::from(format!("{}{}", a, b))),

            (Lt | Le | Gt | Ge, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(compare(op, a, b))),
            (Lt | Le | Gt | Ge, Value::Float(a), Value::Float(b)) => Ok(Value::Bool(compare(op, a, b))),
            (Lt | Le | Gt | Ge, Value::String(a), Value::String(b)) => Ok(Value::Bool(compare(op, a, b))),

            (And, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a && *b)),
            (Or, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a || *b)),

            _ if std::mem::discriminant(l) != std::mem::discriminant(r) => Err(RuntimeError::TypeMismatch {
                op,
                left: l.type_name(),
                right: r.type_name(),
            }),
            _ => Err(RuntimeError::TypeError(format!(
                "operator `{}` is not defined for {}",
                op,
                l.type_name()
            ))),
        }
    }
}

fn compare<T: PartialOrd + ?Sized>(op: OperatorKind, a: &T, b: &T) -> bool {
    match op {
        OperatorKind::Lt => a < b,
        OperatorKind::Le => a <= b,
        OperatorKind::Gt => a > b,
        _ => a >= b,
    }
}
