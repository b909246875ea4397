// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Program tree: scopes, statements, expressions and their operands.
//!
//! An [`Expression`] is an optional left operand `a`, an optional operator and
//! an optional right operand `b`. Leaf expressions carry only `a`. Which of
//! `a`/`b` an operator takes is fixed by [`OperatorKind::arity`], and the
//! constructors below refuse to build anything else.

use std::fmt;
use std::rc::Rc;

use crate::Span;

/// Root of one parsed script. Handed to the interpreter as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Scope,
}

/// An ordered block of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub body: Vec<Statement>,
    pub span: Span,
}

/// One top-level expression inside a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub body: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub a: Option<Box<Operand>>,
    pub op: Option<Operator>,
    pub b: Option<Box<Operand>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operator {
    pub kind: OperatorKind,
    pub span: Span,
}

impl Operator {
    pub fn new(kind: OperatorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every operation the language supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Assign,
    Return,
    Not,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Compound assignment
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    Inc,
    Dec,
    /// Property access (`parent.child`)
    Child,
}

/// Which operand slots an operator fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Both `a` and `b`.
    Binary,
    /// Only `b`.
    Prefix,
    /// Exactly one of `a` (postfix) or `b` (prefix).
    Either,
}

impl OperatorKind {
    pub fn arity(self) -> Arity {
        use OperatorKind::*;
        match self {
            Return | Not => Arity::Prefix,
            Inc | Dec => Arity::Either,
            Assign | Eq | Ne | Lt | Le | Gt | Ge | And | Or | Add | Sub | Mul | Div | Mod
            | AddAssign | SubAssign | MulAssign | DivAssign | ModAssign | Child => Arity::Binary,
        }
    }

    /// The arithmetic operator a compound assignment applies.
    pub fn compound_base(self) -> Option<OperatorKind> {
        use OperatorKind::*;
        match self {
            AddAssign => Some(Add),
            SubAssign => Some(Sub),
            MulAssign => Some(Mul),
            DivAssign => Some(Div),
            ModAssign => Some(Mod),
            _ => None,
        }
    }

    pub fn is_assignment(self) -> bool {
        self == OperatorKind::Assign || self.compound_base().is_some()
    }

    pub fn symbol(self) -> &'static str {
        use OperatorKind::*;
        match self {
            Assign => "=",
            Return => "return",
            Not => "!",
            Eq => "==",
            Ne => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            And => "&&",
            Or => "||",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            Inc => "++",
            Dec => "--",
            Child => ".",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Anything that can sit in an expression's `a` or `b` slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Literal),
    Variable(Variable),
    Object(ObjectLiteral),
    Scope(Scope),
    Expression(Expression),
    Function(FunctionLiteral),
    Call(Call),
}

impl Operand {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Operand::Value(_) => "value",
            Operand::Variable(_) => "variable",
            Operand::Object(_) => "object literal",
            Operand::Scope(_) => "scope",
            Operand::Expression(_) => "expression",
            Operand::Function(_) => "function",
            Operand::Call(_) => "call",
        }
    }
}

/// A constant written in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub hint: VariableHint,
    pub span: Span,
}

impl Variable {
    pub fn new(name: impl Into<String>, hint: VariableHint, span: Span) -> Self {
        Self { name: name.into(), hint, span }
    }
}

/// Whether a variable reference declares (`let`) or must already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableHint {
    None,
    Create,
}

/// `{ key: expr, ... }` in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub properties: Vec<(String, Expression)>,
}

/// `(params) => { body }`
///
/// The body is reference counted so closure values created from it can
/// share the tree instead of copying it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub parameters: Vec<String>,
    pub body: Rc<Scope>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callable: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl Expression {
    pub fn leaf(a: Operand, span: Span) -> Self {
        Self { a: Some(Box::new(a)), op: None, b: None, span }
    }

    /// # Panics
    /// If `op` is not a binary operator.
    pub fn binary(a: Operand, op: Operator, b: Operand, span: Span) -> Self {
        assert_eq!(op.kind.arity(), Arity::Binary, "`{}` is not a binary operator", op.kind);
        Self { a: Some(Box::new(a)), op: Some(op), b: Some(Box::new(b)), span }
    }

    /// # Panics
    /// If `op` does not accept a lone right operand.
    pub fn prefix(op: Operator, b: Operand, span: Span) -> Self {
        assert_ne!(op.kind.arity(), Arity::Binary, "`{}` needs two operands", op.kind);
        Self { a: None, op: Some(op), b: Some(Box::new(b)), span }
    }

    /// # Panics
    /// If `op` does not accept a lone left operand.
    pub fn postfix(a: Operand, op: Operator, span: Span) -> Self {
        assert_eq!(op.kind.arity(), Arity::Either, "`{}` cannot be used as a postfix operator", op.kind);
        Self { a: Some(Box::new(a)), op: Some(op), b: None, span }
    }

    /// Unwraps a leaf expression into its operand; anything else is wrapped.
    pub fn into_operand(self) -> Operand {
        match self {
            Expression { a: Some(a), op: None, b: None, .. } => *a,
            other => Operand::Expression(other),
        }
    }

    pub fn operator(&self) -> Option<OperatorKind> {
        self.op.map(|op| op.kind)
    }

    /// Checks that the operand slots match the operator's arity.
    pub fn check_shape(&self) -> Result<(), String> {
        let (has_a, has_b) = (self.a.is_some(), self.b.is_some());
        let Some(op) = self.op else {
            return match (has_a, has_b) {
                (true, false) => Ok(()),
                (_, true) => Err("expression has a second operand but no operator".to_string()),
                (false, false) => Err("expression is empty".to_string()),
            };
        };
        let ok = match op.kind.arity() {
            Arity::Binary => has_a && has_b,
            Arity::Prefix => !has_a && has_b,
            Arity::Either => has_a != has_b,
        };
        if ok {
            Ok(())
        } else {
            Err(format!(
                "operator `{}` expects {}",
                op.kind,
                match op.kind.arity() {
                    Arity::Binary => "two operands",
                    Arity::Prefix => "only a right operand",
                    Arity::Either => "exactly one operand",
                }
            ))
        }
    }

    /// True for `name` and `parent.child`, the only forms assignment accepts.
    pub fn is_assignment_target(&self) -> bool {
        match (&self.a, self.op) {
            (Some(a), None) => matches!(**a, Operand::Variable(Variable { hint: VariableHint::None, .. })),
            (Some(_), Some(op)) => op.kind == OperatorKind::Child,
            _ => false,
        }
    }
}
