// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Property-based tests for call arity, operand typing and `return`.

use gse_interp::{run_source, Context, Interpreter, RuntimeError, ScriptError, Value};
use proptest::prelude::*;

fn run(src: &str) -> Result<Value, ScriptError> {
    let ctx = Context::new();
    let result = run_source(&Interpreter::new(), &ctx, src);
    ctx.teardown();
    result
}

fn runtime_error(src: &str) -> Option<RuntimeError> {
    match run(src) {
        Err(ScriptError::Runtime(diag)) => Some(diag.error),
        _ => None,
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// A literal of each runtime type, tagged with a type index.
fn arb_typed_literal() -> impl Strategy<Value = (usize, String)> {
    prop_oneof![
        (0i64..1000).prop_map(|n| (0, n.to_string())),
        (0u32..1000, 0u32..100).prop_map(|(w, f)| (1, format!("{}.{}", w, f))),
        "[a-z ]{0,8}".prop_map(|s| (2, format!("'{}'", s))),
        any::<bool>().prop_map(|b| (3, b.to_string())),
        Just((4, "null".to_string())),
        Just((5, "{}".to_string())),
        Just((6, "(() => {})".to_string())),
    ]
}

fn arb_strict_op() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("%"),
        Just("<"),
        Just("<="),
        Just(">"),
        Just(">="),
        Just("&&"),
        Just("||"),
    ]
}

fn params(n: usize) -> String {
    (0..n).map(|i| format!("p{}", i)).collect::<Vec<_>>().join(", ")
}

fn args(n: usize) -> String {
    (0..n).map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn wrong_argument_count_is_an_arity_error(declared in 0usize..6, passed in 0usize..6) {
        prop_assume!(declared != passed);
        let src = format!("let f = ({}) => {{ return 0; }}; f({});", params(declared), args(passed));
        match runtime_error(&src) {
            Some(RuntimeError::ArityMismatch { expected, got }) => {
                prop_assert_eq!(expected, declared);
                prop_assert_eq!(got, passed);
            }
            other => prop_assert!(false, "expected arity error, got {:?}", other),
        }
    }

    #[test]
    fn matching_argument_count_succeeds(n in 0usize..6) {
        let src = format!("let f = ({}) => {{ return 7; }}; return f({});", params(n), args(n));
        prop_assert_eq!(run(&src).ok(), Some(Value::Int(7)));
    }

    #[test]
    fn operands_of_different_types_never_coerce(
        (lt, l) in arb_typed_literal(),
        (rt, r) in arb_typed_literal(),
        op in arb_strict_op(),
    ) {
        prop_assume!(lt != rt);
        let src = format!("return {} {} {};", l, op, r);
        let err = runtime_error(&src);
        prop_assert!(
            matches!(err, Some(RuntimeError::TypeMismatch { .. })),
            "`{}` gave {:?}", src, err
        );
    }

    #[test]
    fn equality_across_types_is_false(
        (lt, l) in arb_typed_literal(),
        (rt, r) in arb_typed_literal(),
    ) {
        prop_assume!(lt != rt);
        prop_assert_eq!(run(&format!("return {} == {};", l, r)).ok(), Some(Value::Bool(false)));
        prop_assert_eq!(run(&format!("return {} != {};", l, r)).ok(), Some(Value::Bool(true)));
    }

    #[test]
    fn return_leaves_every_enclosing_block(depth in 0usize..8, value in 0i64..10_000) {
        let open = "{ ".repeat(depth);
        let close = "}; ".repeat(depth);
        let src = format!(
            "let after = 0; let f = () => {{ {}return {}; {}after = 1; }}; let r = f(); return r + after;",
            open, value, close
        );
        prop_assert_eq!(run(&src).ok(), Some(Value::Int(value)));
    }
}
