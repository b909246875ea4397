// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree types for the game scripting engine.
//!
//! This crate defines the tokens and AST nodes shared between the lexer,
//! parser, and interpreter. The tree is built once by the parser and never
//! mutated afterwards.

pub mod span;
pub mod token;
pub mod program;
pub mod compare;

pub use span::{LineMap, SourcePosition, Span};
pub use token::{Token, TokenKind};
pub use program::{
    Arity, Call, Expression, FunctionLiteral, Literal, ObjectLiteral, Operand, Operator, OperatorKind,
    Program, Scope, Statement, Variable, VariableHint,
};
