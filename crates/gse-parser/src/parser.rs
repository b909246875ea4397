// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation using Pratt parsing for expressions.

use gse_ast::token::{Token, TokenKind};
use gse_ast::{
    Call, Expression, FunctionLiteral, Literal, ObjectLiteral, Operand, Operator, OperatorKind, Program, Scope,
    SourcePosition, Span, Statement, Variable, VariableHint,
};
use std::rc::Rc;

/// Deepest nesting of expressions, blocks and object literals accepted.
const MAX_NESTING: usize = 128;

/// The parser for script source. Stops at the first error.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token { kind: TokenKind::Eof, span: Span::new(end, end) });
        }
        Self { tokens, pos: 0, depth: 0 }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        self.tokens[self.pos.saturating_sub(1)].span.end
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(kind.display_name(), self.current_kind(), self.current().span))
        }
    }

    /// `;`, or nothing when the statement is the last one in its block.
    fn expect_terminator(&mut self) -> Result<(), ParseError> {
        if self.match_token(&TokenKind::Semi) || self.check(&TokenKind::Eof) || self.check(&TokenKind::RBrace) {
            Ok(())
        } else {
            Err(ParseError::expected("';'", self.current_kind(), self.current().span))
        }
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new("Expression nested too deeply", self.current().span)
                .with_hint("split it up using intermediate variables"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::expected("a name", self.current_kind(), self.current().span)),
        }
    }

    // =========================================================================
    // Program and Scopes
    // =========================================================================

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let start = self.current().span.start;
        let body = self.parse_statements()?;
        if !self.at_end() {
            // Only a stray `}` can stop the statement loop early.
            return Err(ParseError::new("Unmatched '}'", self.current().span)
                .with_hint("remove it, or add the '{' it was meant to close"));
        }
        Ok(Program { body: Scope { body, span: Span::new(start, self.prev_end().max(start)) } })
    }

    /// Statements up to (not including) the next `}` or end of input.
    fn parse_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if let Some(stmt) = self.parse_statement()? {
                body.push(stmt);
            }
        }
        Ok(body)
    }

    /// `{ statements }`
    fn parse_block(&mut self) -> Result<Scope, ParseError> {
        self.nested(Self::parse_block_inner)
    }

    fn parse_block_inner(&mut self) -> Result<Scope, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?.span.start;
        let body = self.parse_statements()?;
        self.expect(&TokenKind::RBrace)?;
        Ok(Scope { body, span: Span::new(start, self.prev_end()) })
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// One statement; `None` for a lone `;`.
    fn parse_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        let start = self.current().span.start;

        let body = match self.current_kind() {
            TokenKind::Semi => {
                self.advance();
                return Ok(None);
            }
            TokenKind::LBrace => {
                let scope = self.parse_block()?;
                self.match_token(&TokenKind::Semi);
                let span = scope.span;
                return Ok(Some(Statement { body: Expression::leaf(Operand::Scope(scope), span), span }));
            }
            TokenKind::Let => self.parse_let()?,
            TokenKind::Return => self.parse_return()?,
            _ => self.parse_expression()?,
        };

        let span = Span::new(start, self.prev_end());
        self.expect_terminator()?;
        Ok(Some(Statement { body, span }))
    }

    /// `let name = expr`
    fn parse_let(&mut self) -> Result<Expression, ParseError> {
        let start = self.expect(&TokenKind::Let)?.span.start;
        let name_span = self.current().span;
        let name = self.expect_ident()?;
        let eq_span = self.current().span;
        self.expect(&TokenKind::Eq)
            .map_err(|e| e.with_hint("declarations need a value, e.g. 'let x = null;'"))?;
        let value = self.parse_expression()?;

        Ok(Expression::binary(
            Operand::Variable(Variable::new(name, VariableHint::Create, name_span)),
            Operator::new(OperatorKind::Assign, eq_span),
            value.into_operand(),
            Span::new(start, self.prev_end()),
        ))
    }

    /// `return expr`, or a bare `return` yielding `null`.
    fn parse_return(&mut self) -> Result<Expression, ParseError> {
        let op_span = self.expect(&TokenKind::Return)?.span;
        let value = if self.check(&TokenKind::Semi) || self.check(&TokenKind::RBrace) || self.at_end() {
            Operand::Value(Literal::Undefined)
        } else {
            self.parse_expression()?.into_operand()
        };
        Ok(Expression::prefix(
            Operator::new(OperatorKind::Return, op_span),
            value,
            Span::new(op_span.start, self.prev_end()),
        ))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expression, ParseError> {
        self.nested(|p| p.parse_expr_bp_inner(min_bp))
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> Result<Expression, ParseError> {
        let start = self.current().span.start;
        let mut lhs = self.parse_prefix()?;

        loop {
            if let Some(bp) = self.postfix_bp() {
                if bp < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs, start)?;
                continue;
            }

            if let Some((l_bp, r_bp)) = self.infix_bp() {
                if l_bp < min_bp {
                    break;
                }

                let op = self.parse_binop()?;
                if op.kind.is_assignment() && !lhs.is_assignment_target() {
                    return Err(ParseError::new("Invalid assignment target", lhs.span)
                        .with_hint("only a variable or a property like 'obj.key' can be assigned"));
                }
                let rhs = self.parse_expr_bp(r_bp)?;
                lhs = Expression::binary(lhs.into_operand(), op, rhs.into_operand(), Span::new(start, self.prev_end()));
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expression, ParseError> {
        let token = self.current().clone();
        let start = token.span.start;

        let literal = |parser: &mut Self, lit: Literal| -> Result<Expression, ParseError> {
            parser.advance();
            Ok(Expression::leaf(Operand::Value(lit), token.span))
        };

        match token.kind {
            TokenKind::Int(n) => literal(self, Literal::Int(n)),
            TokenKind::Float(n) => literal(self, Literal::Float(n)),
            TokenKind::String(s) => literal(self, Literal::String(s)),
            TokenKind::Bool(b) => literal(self, Literal::Bool(b)),
            TokenKind::Null => literal(self, Literal::Undefined),

            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expression::leaf(Operand::Variable(Variable::new(name, VariableHint::None, token.span)), token.span))
            }

            // Negative numbers are folded into the literal.
            TokenKind::Minus => {
                self.advance();
                let lit = match self.current_kind() {
                    TokenKind::Int(n) => Literal::Int(n.wrapping_neg()),
                    TokenKind::Float(n) => Literal::Float(-n),
                    _ => {
                        return Err(ParseError::new("'-' can only negate a number literal", token.span)
                            .with_hint("write the subtraction out, e.g. '0 - x'"));
                    }
                };
                self.advance();
                Ok(Expression::leaf(Operand::Value(lit), Span::new(start, self.prev_end())))
            }

            TokenKind::Bang | TokenKind::PlusPlus | TokenKind::MinusMinus => {
                self.advance();
                let kind = match token.kind {
                    TokenKind::Bang => OperatorKind::Not,
                    TokenKind::PlusPlus => OperatorKind::Inc,
                    _ => OperatorKind::Dec,
                };
                let operand = self.parse_expr_bp(Self::PREFIX_BP)?;
                Ok(Expression::prefix(
                    Operator::new(kind, token.span),
                    operand.into_operand(),
                    Span::new(start, self.prev_end()),
                ))
            }

            TokenKind::LParen if self.looks_like_function() => self.parse_function(),

            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(Expression { span: Span::new(start, self.prev_end()), ..inner })
            }

            TokenKind::LBrace => self.parse_object_literal(),

            TokenKind::Return => Err(ParseError::new("'return' must start a statement", token.span)
                .with_hint("move the 'return' to the beginning of the statement")),

            TokenKind::Let => Err(ParseError::new("'let' must start a statement", token.span)
                .with_hint("declare the variable on its own line first")),

            _ => Err(ParseError::expected("expression", &token.kind, token.span)),
        }
    }

    fn parse_postfix(&mut self, lhs: Expression, start: usize) -> Result<Expression, ParseError> {
        let token = self.current().clone();

        match token.kind {
            TokenKind::LParen => {
                self.advance();
                let arguments = self.parse_args()?;
                self.expect(&TokenKind::RParen)?;
                let span = Span::new(start, self.prev_end());
                Ok(Expression::leaf(Operand::Call(Call { callable: Box::new(lhs), arguments }), span))
            }

            TokenKind::Dot => {
                self.advance();
                let key_span = self.current().span;
                let key = self
                    .expect_ident()
                    .map_err(|e| e.with_hint("property names follow '.', e.g. 'obj.key'"))?;
                Ok(Expression::binary(
                    lhs.into_operand(),
                    Operator::new(OperatorKind::Child, token.span),
                    Operand::Variable(Variable::new(key, VariableHint::None, key_span)),
                    Span::new(start, self.prev_end()),
                ))
            }

            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                self.advance();
                let kind = if token.kind == TokenKind::PlusPlus { OperatorKind::Inc } else { OperatorKind::Dec };
                Ok(Expression::postfix(
                    lhs.into_operand(),
                    Operator::new(kind, token.span),
                    Span::new(start, self.prev_end()),
                ))
            }

            _ => Ok(lhs),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut args = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }

    /// `{ key: expr, 'other key': expr, }`
    fn parse_object_literal(&mut self) -> Result<Expression, ParseError> {
        self.nested(Self::parse_object_literal_inner)
    }

    fn parse_object_literal_inner(&mut self) -> Result<Expression, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?.span.start;
        let mut properties = Vec::new();

        while !self.check(&TokenKind::RBrace) {
            let key = match self.current_kind().clone() {
                TokenKind::Ident(name) | TokenKind::String(name) => {
                    self.advance();
                    name
                }
                _ => return Err(ParseError::expected("property name", self.current_kind(), self.current().span)),
            };
            self.expect(&TokenKind::Colon)?;
            properties.push((key, self.parse_expression()?));
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Expression::leaf(Operand::Object(ObjectLiteral { properties }), Span::new(start, self.prev_end())))
    }

    /// `(` ident-list `)` `=>` ahead of the cursor.
    fn looks_like_function(&self) -> bool {
        let mut n = 1;
        if self.peek(n) != &TokenKind::RParen {
            loop {
                if !matches!(self.peek(n), TokenKind::Ident(_)) {
                    return false;
                }
                n += 1;
                match self.peek(n) {
                    TokenKind::Comma => n += 1,
                    TokenKind::RParen => break,
                    _ => return false,
                }
            }
        }
        self.peek(n + 1) == &TokenKind::FatArrow
    }

    /// `(a, b) => { body }`
    fn parse_function(&mut self) -> Result<Expression, ParseError> {
        let start = self.expect(&TokenKind::LParen)?.span.start;

        let mut parameters = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let name_span = self.current().span;
            let name = self.expect_ident()?;
            if parameters.contains(&name) {
                return Err(ParseError::new(format!("Duplicate parameter '{}'", name), name_span));
            }
            parameters.push(name);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::FatArrow)?;
        let body = self.parse_block()?;

        Ok(Expression::leaf(
            Operand::Function(FunctionLiteral { parameters, body: Rc::new(body) }),
            Span::new(start, self.prev_end()),
        ))
    }

    // =========================================================================
    // Operator Precedence
    // =========================================================================

    const PREFIX_BP: u8 = 15;

    fn postfix_bp(&self) -> Option<u8> {
        match self.current_kind() {
            TokenKind::LParen | TokenKind::Dot => Some(17),
            TokenKind::PlusPlus | TokenKind::MinusMinus => Some(16),
            _ => None,
        }
    }

    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.current_kind() {
            TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq => Some((2, 1)),
            TokenKind::PipePipe => Some((3, 4)),
            TokenKind::AmpAmp => Some((5, 6)),
            TokenKind::EqEq | TokenKind::BangEq => Some((7, 8)),
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => Some((9, 10)),
            TokenKind::Plus | TokenKind::Minus => Some((11, 12)),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((13, 14)),
            _ => None,
        }
    }

    fn parse_binop(&mut self) -> Result<Operator, ParseError> {
        let kind = match self.current_kind() {
            TokenKind::Eq => OperatorKind::Assign,
            TokenKind::PlusEq => OperatorKind::AddAssign,
            TokenKind::MinusEq => OperatorKind::SubAssign,
            TokenKind::StarEq => OperatorKind::MulAssign,
            TokenKind::SlashEq => OperatorKind::DivAssign,
            TokenKind::PercentEq => OperatorKind::ModAssign,
            TokenKind::Plus => OperatorKind::Add,
            TokenKind::Minus => OperatorKind::Sub,
            TokenKind::Star => OperatorKind::Mul,
            TokenKind::Slash => OperatorKind::Div,
            TokenKind::Percent => OperatorKind::Mod,
            TokenKind::EqEq => OperatorKind::Eq,
            TokenKind::BangEq => OperatorKind::Ne,
            TokenKind::Lt => OperatorKind::Lt,
            TokenKind::Gt => OperatorKind::Gt,
            TokenKind::LtEq => OperatorKind::Le,
            TokenKind::GtEq => OperatorKind::Ge,
            TokenKind::AmpAmp => OperatorKind::And,
            TokenKind::PipePipe => OperatorKind::Or,
            _ => {
                return Err(ParseError::expected(
                    "operator like '+' or '-'",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        let span = self.advance().span;
        Ok(Operator::new(kind, span))
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
    /// 1-based line/column of `span.start`, filled in by [`crate::parse`].
    pub position: SourcePosition,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { span, message: message.into(), hint: None, position: SourcePosition::default() }
    }

    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { hint, ..Self::new(message, span) }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "';'" => format!("Expected ';' after statement, found {}", found.display_name()),
        "'{'" => format!("Expected '{{' to start block, found {}", found.display_name()),
        "'}'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '{' - missing '}'".to_string()
            } else {
                format!("Expected '}}' to close block, found {}", found.display_name())
            }
        }
        "')'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '(' - missing ')'".to_string()
            } else {
                format!("Expected ')', found {}", found.display_name())
            }
        }
        "a name" => format!("Expected name, found {}", found.display_name()),
        "expression" => format!("Expected expression, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
