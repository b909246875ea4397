// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use gse_ast::token::{Token, TokenKind};
use gse_ast::Span;
use logos::Logos;

/// Raw token type for logos; literal values are decoded in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    // === Keywords ===
    #[token("let")]
    Let,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // === Operators (longer first) ===
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("=>")]
    FatArrow,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Bang,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // === Comments ===
    #[token("/*", block_comment)]
    BlockComment(CommentEnd),

    // === Literals ===
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    String,

    // Longest-match means these only win when the closing quote is missing.
    #[regex(r#""([^"\\]|\\.)*"#)]
    #[regex(r"'([^'\\]|\\.)*")]
    UnterminatedString,

    // === Identifier (after keywords) ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CommentEnd {
    Closed,
    Unterminated,
}

/// Consume a block comment, tracking nesting.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) -> CommentEnd {
    let mut depth = 1;
    let mut chars = lexer.remainder().chars().peekable();
    let mut consumed = 0;

    while depth > 0 {
        match chars.next() {
            Some('/') if chars.peek() == Some(&'*') => {
                chars.next();
                consumed += 2;
                depth += 1;
            }
            Some('*') if chars.peek() == Some(&'/') => {
                chars.next();
                consumed += 2;
                depth -= 1;
            }
            Some(c) => consumed += c.len_utf8(),
            None => break,
        }
    }

    lexer.bump(consumed);
    if depth == 0 {
        CommentEnd::Closed
    } else {
        CommentEnd::Unterminated
    }
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for script source.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(RawToken::BlockComment(CommentEnd::Closed)) => continue,
                Ok(raw) => match self.convert_token(raw, slice, span.start, span.end) {
                    Ok(kind) => kind,
                    Err(e) => {
                        self.errors.push(e);
                        continue;
                    }
                },
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    self.errors.push(LexError::unexpected_char(ch, span.start));
                    continue;
                }
            };

            tokens.push(Token { kind, span: Span::new(span.start, span.end) });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        LexResult { tokens, errors: std::mem::take(&mut self.errors) }
    }

    fn convert_token(&self, raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
        Ok(match raw {
            RawToken::Let => TokenKind::Let,
            RawToken::Return => TokenKind::Return,
            RawToken::True => TokenKind::Bool(true),
            RawToken::False => TokenKind::Bool(false),
            RawToken::Null => TokenKind::Null,

            RawToken::EqEq => TokenKind::EqEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::PercentEq => TokenKind::PercentEq,
            RawToken::FatArrow => TokenKind::FatArrow,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Dot => TokenKind::Dot,

            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Comma => TokenKind::Comma,

            RawToken::Int => {
                let value = slice.parse::<i64>().map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Int(value)
            }
            RawToken::Float => {
                let value = slice.parse::<f64>().map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Float(value)
            }
            RawToken::String => {
                let inner = &slice[1..slice.len() - 1];
                TokenKind::String(parse_string(inner, start + 1)?)
            }
            RawToken::UnterminatedString => {
                return Err(LexError::unterminated_string(start, end, &slice[..1]));
            }
            RawToken::Ident => TokenKind::Ident(slice.to_string()),

            RawToken::BlockComment(_) => return Err(LexError::unterminated_comment(start)),
        })
    }
}

/// Decode escapes in a string literal body. `offset` is the body's byte
/// position, used to point errors at the offending backslash.
fn parse_string(s: &str, offset: usize) -> Result<String, LexError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.char_indices();

    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let escaped = match chars.next().map(|(_, e)| e) {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('\\') => '\\',
            Some('0') => '\0',
            Some('\'') => '\'',
            Some('"') => '"',
            _ => return Err(LexError::invalid_escape(offset + i)),
        };
        result.push(escaped);
    }

    Ok(result)
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint: None,
        }
    }

    fn unterminated_string(start: usize, end: usize, quote: &str) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Unterminated string".to_string(),
            hint: Some(format!("Add a closing '{}'", quote)),
        }
    }

    fn unterminated_comment(start: usize) -> Self {
        Self {
            span: Span::new(start, start + 2),
            message: "Unterminated block comment".to_string(),
            hint: Some("Every '/*' needs a matching '*/'".to_string()),
        }
    }

    fn invalid_escape(pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + 2),
            message: "Invalid escape sequence".to_string(),
            hint: Some("Valid: \\n \\r \\t \\\\ \\0 \\' \\\"".to_string()),
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Invalid number".to_string(),
            hint: Some("Integers must fit in 64 bits".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let result = Lexer::new(source).tokenize();
        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    fn first_error(source: &str) -> LexError {
        Lexer::new(source).tokenize().errors.into_iter().next().expect("expected a lex error")
    }

    #[test]
    fn let_statement() {
        assert_eq!(
            kinds("let a = 5;"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("a".into()),
                TokenKind::Eq,
                TokenKind::Int(5),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn compound_operators_prefer_longest_match() {
        assert_eq!(
            kinds("a++ += -- -= => == != <= >= && ||"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::PlusPlus,
                TokenKind::PlusEq,
                TokenKind::MinusMinus,
                TokenKind::MinusEq,
                TokenKind::FatArrow,
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn literals() {
        assert_eq!(
            kinds(r#"12 3.5 1.0e3 'hi' "a\"b" true false null"#),
            vec![
                TokenKind::Int(12),
                TokenKind::Float(3.5),
                TokenKind::Float(1000.0),
                TokenKind::String("hi".into()),
                TokenKind::String("a\"b".into()),
                TokenKind::Bool(true),
                TokenKind::Bool(false),
                TokenKind::Null,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_need_word_boundary() {
        assert_eq!(
            kinds("letter returned"),
            vec![TokenKind::Ident("letter".into()), TokenKind::Ident("returned".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let src = "a // trailing\n/* outer /* inner */ still comment */ b";
        assert_eq!(
            kinds(src),
            vec![TokenKind::Ident("a".into()), TokenKind::Ident("b".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn line_comment_leaves_slash_operators_alone() {
        assert_eq!(
            kinds("a / b // c /= d\nx /= 2 //"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Slash,
                TokenKind::Ident("b".into()),
                TokenKind::Ident("x".into()),
                TokenKind::SlashEq,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn spans_are_byte_offsets() {
        let result = Lexer::new("let  x").tokenize();
        assert_eq!(result.tokens[1].span, Span::new(5, 6));
        assert_eq!(result.tokens[2].span, Span::new(6, 6));
    }

    #[test]
    fn unterminated_string() {
        let err = first_error("let s = 'abc;");
        assert_eq!(err.message, "Unterminated string");
        assert_eq!(err.span.start, 8);
        assert_eq!(err.hint.as_deref(), Some("Add a closing '''"));
    }

    #[test]
    fn unterminated_block_comment() {
        let err = first_error("a; /* never closed");
        assert_eq!(err.message, "Unterminated block comment");
        assert_eq!(err.span.start, 3);
    }

    #[test]
    fn bad_escape() {
        let err = first_error(r#""a\qb""#);
        assert_eq!(err.message, "Invalid escape sequence");
        assert_eq!(err.span.start, 2);
    }

    #[test]
    fn unexpected_character_is_collected() {
        let result = Lexer::new("a # b $").tokenize();
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].message, "Unexpected character '#'");
        // The bad characters are dropped; the rest still lexes.
        assert_eq!(result.tokens.len(), 3);
    }

    #[test]
    fn integer_overflow() {
        let err = first_error("99999999999999999999");
        assert_eq!(err.message, "Invalid number");
    }
}
