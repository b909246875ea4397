// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use gse_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        ("':'", TokenKind::Eq) => Some("object properties use ':', e.g. '{ key: 1 }'"),
        ("':'", _) => Some("syntax: { key: value }"),

        ("'{'", _) => Some("function bodies are blocks: '(a) => { ... }'"),
        ("'}'", _) => Some("every '{' needs a matching '}'"),

        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", _) => Some("separate arguments with ','"),

        ("'=>'", _) => Some("function literals look like '(a, b) => { ... }'"),
        ("'='", _) => None,

        ("operator like '+' or '-'", _) => Some("expected a binary operator"),

        ("expression", TokenKind::Semi) => Some("statement is incomplete"),
        ("expression", TokenKind::RParen) => Some("parentheses need something inside"),
        ("expression", TokenKind::Eof) => Some("the script ends in the middle of an expression"),
        ("expression", _) => Some("try a value, variable, or function call"),

        ("a name", TokenKind::Int(_)) => Some("names can't start with a number"),
        ("a name", _) => Some("names start with a letter or '_'"),

        ("property name", _) => Some("keys are names or quoted strings"),

        ("';'", TokenKind::Ident(_)) => Some("did you forget a ';' at the end of the previous line?"),
        ("';'", _) => Some("end statements with ';'"),

        _ => None,
    }
}
