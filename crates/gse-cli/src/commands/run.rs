// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Script execution.

use gse_ast::Span;
use gse_diagnostics::ToDiagnostic;
use gse_interp::{Context, Interpreter, InterpreterConfig, Object, RuntimeDiagnostic, Value};

use crate::{fail, print_json, read_source, Format, Phase};

pub fn cmd_run(path: &str, format: Format, max_depth: usize) {
    let source = read_source(path);
    let program = match gse_parser::parse(&source) {
        Ok(program) => program,
        Err(e) => fail(&[e.to_diagnostic()], &source, path, Phase::Parse, format),
    };

    let interp = Interpreter::with_config(InterpreterConfig::default().with_max_call_depth(max_depth));
    let ctx = Context::new();
    if let Err(e) = ctx.create_variable("console", Value::Object(console())) {
        let diag = RuntimeDiagnostic::new(e, Span::default());
        fail(&[diag.to_diagnostic()], &source, path, Phase::Run, format);
    }

    tracing::debug!(path, max_depth, "running script");
    let result = interp.execute(&ctx, &program);
    ctx.teardown();

    match result {
        Ok(_) if format == Format::Json => print_json(&[], &source, path, Phase::Run),
        Ok(_) => {}
        Err(diag) => fail(&[diag.to_diagnostic()], &source, path, Phase::Run, format),
    }
}

/// The host object scripts print through.
fn console() -> Object {
    let console = Object::new();
    console.set(
        "log",
        Value::native(|_, args| {
            let line: Vec<String> = args.iter().map(Value::to_string).collect();
            println!("{}", line.join(" "));
            Ok(Value::Undefined)
        }),
    );
    console
}
