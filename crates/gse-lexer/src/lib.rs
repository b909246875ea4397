// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for game scripts.
//!
//! Turns source text into the token stream the parser consumes. Errors are
//! collected rather than fatal so a caller can see several at once.

mod lexer;

pub use lexer::{LexError, LexResult, Lexer};

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> LexResult {
    Lexer::new(source).tokenize()
}
