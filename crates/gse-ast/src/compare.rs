// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Structural comparison of program trees, ignoring source positions.
//!
//! Two parses of the same script are expected to match exactly; a parse and a
//! hand-built tree will differ in spans only. [`diff`] reports the first
//! difference with a path like `body[2].a.call.arguments[0]`.

use std::fmt;

use crate::program::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub path: String,
    pub expected: String,
    pub found: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: expected {}, found {}", self.path, self.expected, self.found)
    }
}

/// First structural difference between two programs, if any.
pub fn diff(expected: &Program, found: &Program) -> Option<Mismatch> {
    let mut path = Vec::new();
    scope(&mut path, &expected.body, &found.body).err()
}

/// `true` when the trees are equal up to spans.
pub fn same_structure(a: &Program, b: &Program) -> bool {
    diff(a, b).is_none()
}

type Walk = Result<(), Mismatch>;

fn mismatch(path: &[String], expected: impl fmt::Display, found: impl fmt::Display) -> Mismatch {
    Mismatch {
        path: if path.is_empty() { "<root>".to_string() } else { path.join(".") },
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

fn nested(path: &mut Vec<String>, segment: String, f: impl FnOnce(&mut Vec<String>) -> Walk) -> Walk {
    path.push(segment);
    let result = f(path);
    path.pop();
    result
}

fn scope(path: &mut Vec<String>, e: &Scope, f: &Scope) -> Walk {
    if e.body.len() != f.body.len() {
        return Err(mismatch(
            path,
            format!("{} statements", e.body.len()),
            format!("{} statements", f.body.len()),
        ));
    }
    for (i, (es, fs)) in e.body.iter().zip(&f.body).enumerate() {
        nested(path, format!("body[{i}]"), |p| expression(p, &es.body, &fs.body))?;
    }
    Ok(())
}

fn expression(path: &mut Vec<String>, e: &Expression, f: &Expression) -> Walk {
    let (eo, fo) = (e.operator(), f.operator());
    if eo != fo {
        let show = |o: Option<OperatorKind>| o.map_or("no operator".to_string(), |k| format!("`{k}`"));
        return Err(mismatch(path, show(eo), show(fo)));
    }
    nested(path, "a".into(), |p| slot(p, e.a.as_deref(), f.a.as_deref()))?;
    nested(path, "b".into(), |p| slot(p, e.b.as_deref(), f.b.as_deref()))
}

fn slot(path: &mut Vec<String>, e: Option<&Operand>, f: Option<&Operand>) -> Walk {
    match (e, f) {
        (None, None) => Ok(()),
        (Some(e), Some(f)) => operand(path, e, f),
        (Some(e), None) => Err(mismatch(path, e.kind_name(), "nothing")),
        (None, Some(f)) => Err(mismatch(path, "nothing", f.kind_name())),
    }
}

fn operand(path: &mut Vec<String>, e: &Operand, f: &Operand) -> Walk {
    match (e, f) {
        (Operand::Value(a), Operand::Value(b)) => {
            if a == b {
                Ok(())
            } else {
                Err(mismatch(path, format!("{a:?}"), format!("{b:?}")))
            }
        }
        (Operand::Variable(a), Operand::Variable(b)) => {
            if a.name != b.name || a.hint != b.hint {
                Err(mismatch(
                    path,
                    format!("variable `{}` ({:?})", a.name, a.hint),
                    format!("variable `{}` ({:?})", b.name, b.hint),
                ))
            } else {
                Ok(())
            }
        }
        (Operand::Object(a), Operand::Object(b)) => {
            if a.properties.len() != b.properties.len() {
                return Err(mismatch(
                    path,
                    format!("{} properties", a.properties.len()),
                    format!("{} properties", b.properties.len()),
                ));
            }
            for ((ak, av), (bk, bv)) in a.properties.iter().zip(&b.properties) {
                if ak != bk {
                    return Err(mismatch(path, format!("property `{ak}`"), format!("property `{bk}`")));
                }
                nested(path, format!("{{{ak}}}"), |p| expression(p, av, bv))?;
            }
            Ok(())
        }
        (Operand::Scope(a), Operand::Scope(b)) => nested(path, "scope".into(), |p| scope(p, a, b)),
        (Operand::Expression(a), Operand::Expression(b)) => expression(path, a, b),
        (Operand::Function(a), Operand::Function(b)) => {
            if a.parameters != b.parameters {
                return Err(mismatch(
                    path,
                    format!("parameters ({})", a.parameters.join(", ")),
                    format!("parameters ({})", b.parameters.join(", ")),
                ));
            }
            nested(path, "fn".into(), |p| scope(p, &a.body, &b.body))
        }
        (Operand::Call(a), Operand::Call(b)) => {
            nested(path, "callee".into(), |p| expression(p, &a.callable, &b.callable))?;
            if a.arguments.len() != b.arguments.len() {
                return Err(mismatch(
                    path,
                    format!("{} arguments", a.arguments.len()),
                    format!("{} arguments", b.arguments.len()),
                ));
            }
            for (i, (ea, fa)) in a.arguments.iter().zip(&b.arguments).enumerate() {
                nested(path, format!("arguments[{i}]"), |p| expression(p, ea, fa))?;
            }
            Ok(())
        }
        _ => Err(mismatch(path, e.kind_name(), f.kind_name())),
    }
}
