// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use crate::output;

pub fn print_usage() {
    println!(
        "{} {} - game script engine",
        output::title("gse"),
        output::version(env!("CARGO_PKG_VERSION"))
    );
    println!();
    println!(
        "{}: {} {} {}",
        output::section_header("Usage"),
        output::command("gse"),
        output::arg("<command>"),
        output::arg("[args]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {} {}     Run a script", output::command("run"), output::arg("<file>"));
    println!("  {} {}     Tokenize a script and print tokens", output::command("lex"), output::arg("<file>"));
    println!("  {} {}   Parse a script and print the tree", output::command("parse"), output::arg("<file>"));
    println!("  {}            Show this help", output::command("help"));
    println!("  {}         Show version", output::command("version"));

    println!();
    println!("{}", output::section_header("Options:"));
    println!(
        "  {} {}  Diagnostic output (default: human)",
        output::arg("--format"),
        output::arg("<human|json>")
    );
    println!("  {}                  Same as --format json", output::arg("--json"));
    println!(
        "  {} {}          Maximum nested script calls for run (default: {})",
        output::arg("--max-depth"),
        output::arg("<n>"),
        gse_interp::DEFAULT_MAX_CALL_DEPTH
    );
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=gse_interp=debug) to trace execution.");
}
