// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from engine error types to `Diagnostic`.

use gse_interp::{RuntimeDiagnostic, RuntimeError, ScriptError};

use crate::{Diagnostic, ToDiagnostic};

/// Lexer error code and label for a lexer message.
fn lex_code(message: &str) -> Option<(&'static str, &'static str)> {
    let entry = if message.starts_with("Unexpected character") {
        ("E0001", "not valid here")
    } else if message.starts_with("Unterminated string") {
        ("E0002", "string starts here")
    } else if message.starts_with("Invalid escape") {
        ("E0003", "unknown escape")
    } else if message.starts_with("Invalid number") {
        ("E0004", "does not fit in an integer")
    } else if message.starts_with("Unterminated block comment") {
        ("E0005", "comment starts here")
    } else {
        return None;
    };
    Some(entry)
}

fn parse_code(message: &str) -> (&'static str, &'static str) {
    if message == "Invalid assignment target" {
        ("E0101", "cannot assign to this")
    } else if message.ends_with("must start a statement") {
        ("E0102", "only allowed at the start of a statement")
    } else if message.starts_with("Unclosed") || message.starts_with("Unmatched") {
        ("E0103", "unbalanced")
    } else if message.starts_with("Duplicate parameter") {
        ("E0104", "already a parameter")
    } else if message.starts_with("'-' can only negate") {
        ("E0105", "needs a number literal")
    } else if message == "Expression nested too deeply" {
        ("E0106", "nesting limit reached here")
    } else {
        ("E0100", "here")
    }
}

// ============================================================================
// Lex Errors
// ============================================================================

impl ToDiagnostic for gse_lexer::LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = lex_code(&self.message).unwrap_or(("E0001", "here"));
        let diag = Diagnostic::error(&self.message).with_code(code).with_primary(self.span, label);
        match &self.hint {
            Some(hint) => diag.with_help(hint.as_str()),
            None => diag,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

impl ToDiagnostic for gse_parser::ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        // The parser reports the first lexer error as its own.
        let (code, label) = lex_code(&self.message).unwrap_or_else(|| parse_code(&self.message));
        let diag = Diagnostic::error(&self.message).with_code(code).with_primary(self.span, label);
        match &self.hint {
            Some(hint) => diag.with_help(hint.as_str()),
            None => diag,
        }
    }
}

// ============================================================================
// Runtime Errors
// ============================================================================

impl ToDiagnostic for RuntimeDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic {
        use RuntimeError::*;

        let message = self.error.to_string();
        let span = self.span;
        match &self.error {
            UndefinedVariable(name) => Diagnostic::error(message)
                .with_code("E0300")
                .with_primary(span, "not defined in any enclosing scope")
                .with_help(format!("declare it first with `let {} = ...;`", name)),

            AlreadyDefined(name) => Diagnostic::error(message)
                .with_code("E0301")
                .with_primary(span, "declared again here")
                .with_help(format!("assign with `{} = ...;` or pick another name", name)),

            TypeMismatch { left, right, .. } => Diagnostic::error(message)
                .with_code("E0302")
                .with_primary(span, format!("{} and {}", left, right))
                .with_note("values are never converted between types"),

            TypeError(_) => Diagnostic::error(message).with_code("E0303").with_primary(span, "here"),

            ArityMismatch { expected, .. } => Diagnostic::error(message)
                .with_code("E0304")
                .with_primary(span, format!("takes {} argument{}", expected, if *expected == 1 { "" } else { "s" })),

            NotCallable(_) => Diagnostic::error(message).with_code("E0305").with_primary(span, "called here"),

            NotAnObject { .. } => Diagnostic::error(message)
                .with_code("E0306")
                .with_primary(span, "not an object"),

            DanglingReference { .. } => Diagnostic::error(message)
                .with_code("E0307")
                .with_primary(span, "used here")
                .with_note("the object was released while a property reference to it was still held"),

            InvalidAssignmentTarget => Diagnostic::error(message)
                .with_code("E0308")
                .with_primary(span, "cannot assign to this"),

            ReturnNotAllowed => Diagnostic::error(message)
                .with_code("E0309")
                .with_primary(span, "no function to return from"),

            DivisionByZero => Diagnostic::error(message).with_code("E0310").with_primary(span, "divisor is zero"),

            IntegerOverflow(_) => Diagnostic::error(message)
                .with_code("E0311")
                .with_primary(span, "result does not fit in 64 bits"),

            CallDepthExceeded { .. } => Diagnostic::error(message)
                .with_code("E0312")
                .with_primary(span, "call made here")
                .with_help("check for recursion without a base case"),

            MalformedExpression(_) => Diagnostic::error(message).with_code("E0313").with_primary(span, "here"),

            Host(_) => Diagnostic::error(message)
                .with_code("E0400")
                .with_primary(span, "in this call")
                .with_note("raised by a native function"),
        }
    }
}

impl ToDiagnostic for ScriptError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ScriptError::Parse(e) => e.to_diagnostic(),
            ScriptError::Runtime(e) => e.to_diagnostic(),
        }
    }
}
