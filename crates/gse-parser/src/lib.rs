// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for game scripts.
//!
//! Transforms source text into a [`Program`]. Parsing is all-or-nothing: the
//! first lex or parse error is returned and no partial tree is produced.

mod hints;
mod parser;

use gse_ast::{LineMap, Program};

pub use parser::{ParseError, Parser};

/// Lex and parse a whole script.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let line_map = LineMap::new(source);
    let locate = |mut err: ParseError| {
        err.position = line_map.position(err.span.start);
        err
    };

    let lexed = gse_lexer::tokenize(source);
    if let Some(first) = lexed.errors.into_iter().next() {
        let err = ParseError { hint: first.hint, ..ParseError::new(first.message, first.span) };
        return Err(locate(err));
    }

    Parser::new(lexed.tokens).parse_program().map_err(locate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gse_ast::compare;
    use gse_ast::{Expression, Literal, Operand, OperatorKind, Statement, VariableHint};

    fn parse_ok(src: &str) -> Program {
        match parse(src) {
            Ok(program) => program,
            Err(e) => panic!("parse failed at {}: {} ({:?})", e.position, e.message, e.hint),
        }
    }

    fn parse_err(src: &str) -> ParseError {
        parse(src).expect_err("expected a parse error")
    }

    fn first(program: &Program) -> &Expression {
        &program.body.body[0].body
    }

    fn operand_expr(op: &Option<Box<Operand>>) -> &Expression {
        match op.as_deref() {
            Some(Operand::Expression(e)) => e,
            other => panic!("expected nested expression, found {:?}", other),
        }
    }

    #[test]
    fn empty_script() {
        assert!(parse_ok("").body.body.is_empty());
        assert!(parse_ok("  // just a comment\n;;").body.body.is_empty());
    }

    #[test]
    fn let_declares_with_create_hint() {
        let program = parse_ok("let a = 5;");
        let expr = first(&program);
        assert_eq!(expr.operator(), Some(OperatorKind::Assign));
        match expr.a.as_deref() {
            Some(Operand::Variable(v)) => {
                assert_eq!(v.name, "a");
                assert_eq!(v.hint, VariableHint::Create);
            }
            other => panic!("expected variable, found {:?}", other),
        }
        assert_eq!(expr.b.as_deref(), Some(&Operand::Value(Literal::Int(5))));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let program = parse_ok("a + 2 * 4;");
        let sum = first(&program);
        assert_eq!(sum.operator(), Some(OperatorKind::Add));
        assert_eq!(operand_expr(&sum.b).operator(), Some(OperatorKind::Mul));
    }

    #[test]
    fn parentheses_override_precedence() {
        let program = parse_ok("(a + 2) * 4;");
        let product = first(&program);
        assert_eq!(product.operator(), Some(OperatorKind::Mul));
        assert_eq!(operand_expr(&product.a).operator(), Some(OperatorKind::Add));
    }

    #[test]
    fn assignment_is_right_associative() {
        let program = parse_ok("a = b = 3;");
        let outer = first(&program);
        assert_eq!(outer.operator(), Some(OperatorKind::Assign));
        assert!(matches!(outer.a.as_deref(), Some(Operand::Variable(_))));
        assert_eq!(operand_expr(&outer.b).operator(), Some(OperatorKind::Assign));
    }

    #[test]
    fn comparison_binds_tighter_than_equality() {
        let program = parse_ok("x == b > c;");
        let eq = first(&program);
        assert_eq!(eq.operator(), Some(OperatorKind::Eq));
        assert_eq!(operand_expr(&eq.b).operator(), Some(OperatorKind::Gt));
    }

    #[test]
    fn increments_pick_a_side() {
        let program = parse_ok("a++; --a;");
        let post = &program.body.body[0].body;
        let pre = &program.body.body[1].body;
        assert_eq!(post.operator(), Some(OperatorKind::Inc));
        assert!(post.a.is_some() && post.b.is_none());
        assert_eq!(pre.operator(), Some(OperatorKind::Dec));
        assert!(pre.a.is_none() && pre.b.is_some());
    }

    #[test]
    fn property_chain_nests_to_the_left() {
        let program = parse_ok("a.b.c = 1;");
        let assign = first(&program);
        let target = operand_expr(&assign.a);
        assert_eq!(target.operator(), Some(OperatorKind::Child));
        assert_eq!(operand_expr(&target.a).operator(), Some(OperatorKind::Child));
    }

    #[test]
    fn call_on_property() {
        let program = parse_ok("console.log(1, 'two');");
        match first(&program).a.as_deref() {
            Some(Operand::Call(call)) => {
                assert_eq!(call.callable.operator(), Some(OperatorKind::Child));
                assert_eq!(call.arguments.len(), 2);
            }
            other => panic!("expected call, found {:?}", other),
        }
    }

    #[test]
    fn function_literal_versus_grouping() {
        let program = parse_ok("let f = (a, b) => { return a; }; let g = () => {}; let h = (a);");
        let value = |i: usize| program.body.body[i].body.b.as_deref();
        match value(0) {
            Some(Operand::Function(f)) => {
                assert_eq!(f.parameters, vec!["a".to_string(), "b".to_string()]);
                assert_eq!(f.body.body.len(), 1);
            }
            other => panic!("expected function, found {:?}", other),
        }
        assert!(matches!(value(1), Some(Operand::Function(f)) if f.parameters.is_empty()));
        assert!(matches!(value(2), Some(Operand::Variable(_))));
    }

    #[test]
    fn braces_are_blocks_at_statement_start_and_objects_elsewhere() {
        let program = parse_ok("{ a = 1; }; let o = { k: 1, 'quoted key': 2, };");
        assert!(matches!(program.body.body[0].body.a.as_deref(), Some(Operand::Scope(_))));
        match program.body.body[1].body.b.as_deref() {
            Some(Operand::Object(obj)) => {
                let keys: Vec<_> = obj.properties.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["k", "quoted key"]);
            }
            other => panic!("expected object literal, found {:?}", other),
        }
    }

    #[test]
    fn negative_literals_are_folded() {
        let program = parse_ok("let x = -5; let y = 2 * -1.5;");
        assert_eq!(program.body.body[0].body.b.as_deref(), Some(&Operand::Value(Literal::Int(-5))));
        let product = operand_expr(&program.body.body[1].body.b);
        assert_eq!(product.b.as_deref(), Some(&Operand::Value(Literal::Float(-1.5))));
    }

    #[test]
    fn last_statement_may_omit_semicolon() {
        let program = parse_ok("let f = () => { return 1 }; f()");
        assert_eq!(program.body.body.len(), 2);
    }

    #[test]
    fn statements_keep_their_span() {
        let program = parse_ok("a;\n  b = 2;");
        let Statement { span, .. } = &program.body.body[1];
        assert_eq!((span.start, span.end), (5, 10));
    }

    #[test]
    fn same_source_parses_to_same_tree() {
        let src = "let o = { a: { b: 1 } }; o.a.b += (2 * 3); let f = (x) => { { return x; }; };";
        assert!(compare::same_structure(&parse_ok(src), &parse_ok(src)));
    }

    // --- errors ---

    #[test]
    fn missing_semicolon() {
        let err = parse_err("let a = 1\nlet b = 2;");
        assert_eq!(err.message, "Expected ';' after statement, found 'let'");
        assert_eq!((err.line(), err.column()), (2, 1));
    }

    #[test]
    fn invalid_assignment_targets() {
        for src in ["1 = 2;", "a + b = 3;", "f() = 1;", "a + 1 += 2;"] {
            let err = parse_err(src);
            assert_eq!(err.message, "Invalid assignment target", "source: {src}");
        }
    }

    #[test]
    fn return_only_at_statement_start() {
        let err = parse_err("let a = return 5;");
        assert_eq!(err.message, "'return' must start a statement");
        assert_eq!((err.line(), err.column()), (1, 9));
    }

    #[test]
    fn unclosed_paren() {
        let err = parse_err("let a = (1 + 2;");
        assert_eq!(err.message, "Expected ')', found ';'");
    }

    #[test]
    fn unclosed_block() {
        let err = parse_err("{\n  a = 1;\n");
        assert_eq!(err.message, "Unclosed '{' - missing '}'");
    }

    #[test]
    fn stray_closing_brace() {
        let err = parse_err("a = 1; }");
        assert_eq!(err.message, "Unmatched '}'");
    }

    #[test]
    fn lex_errors_surface_as_parse_errors() {
        let err = parse_err("let s = 'open;\n");
        assert_eq!(err.message, "Unterminated string");
        assert_eq!((err.line(), err.column()), (1, 9));
    }

    #[test]
    fn unary_minus_needs_a_literal() {
        let err = parse_err("let a = -b;");
        assert_eq!(err.message, "'-' can only negate a number literal");
    }

    #[test]
    fn nesting_is_bounded() {
        let parens = format!("return {}1{};", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(parse_err(&parens).message, "Expression nested too deeply");

        let nots = format!("return {}true;", "!".repeat(3_000));
        assert_eq!(parse_err(&nots).message, "Expression nested too deeply");

        let blocks = format!("{}{}", "{".repeat(5_000), "}".repeat(5_000));
        assert_eq!(parse_err(&blocks).message, "Expression nested too deeply");

        let objects = format!("let o = {}1{};", "{ k: ".repeat(5_000), " }".repeat(5_000));
        assert_eq!(parse_err(&objects).message, "Expression nested too deeply");
    }

    #[test]
    fn moderate_nesting_parses() {
        let parens = format!("return {}1{};", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse_ok(&parens).body.body.len(), 1);
        let blocks = format!("{}a = 1;{}", "{".repeat(60), "}".repeat(60));
        assert_eq!(parse_ok(&blocks).body.body.len(), 1);
    }

    #[test]
    fn duplicate_parameter() {
        let err = parse_err("let f = (a, a) => {};");
        assert_eq!(err.message, "Duplicate parameter 'a'");
    }
}
