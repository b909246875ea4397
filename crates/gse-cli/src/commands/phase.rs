// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Front-end inspection commands: lex, parse.

use gse_ast::LineMap;
use gse_diagnostics::ToDiagnostic;

use crate::{fail, output, print_json, read_source, Format, Phase};

pub fn cmd_lex(path: &str, format: Format) {
    let source = read_source(path);
    let result = gse_lexer::tokenize(&source);

    if !result.is_ok() {
        let diagnostics: Vec<_> = result.errors.iter().map(|e| e.to_diagnostic()).collect();
        fail(&diagnostics, &source, path, Phase::Lex, format);
    }

    if format == Format::Json {
        print_json(&[], &source, path, Phase::Lex);
        return;
    }

    let line_map = LineMap::new(&source);
    println!("{}\n", output::section(&format!("Tokens ({})", result.tokens.len())));
    for tok in &result.tokens {
        let pos = line_map.position(tok.span.start);
        println!("{:>8}  {:?}", pos.to_string(), tok.kind);
    }
    println!("\n{}", output::banner_ok("Lex"));
}

pub fn cmd_parse(path: &str, format: Format) {
    let source = read_source(path);
    let program = match gse_parser::parse(&source) {
        Ok(program) => program,
        Err(e) => fail(&[e.to_diagnostic()], &source, path, Phase::Parse, format),
    };

    if format == Format::Json {
        print_json(&[], &source, path, Phase::Parse);
        return;
    }

    println!("{}\n", output::section(&format!("Program ({} statements)", program.body.body.len())));
    for (i, stmt) in program.body.body.iter().enumerate() {
        println!("--- Statement {} ---", i + 1);
        println!("{:#?}", stmt.body);
        println!();
    }
    println!("{}", output::banner_ok("Parse"));
}
