// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! gse CLI - script runner and front-end inspector.

mod commands;
mod help;
mod output;

use std::env;
use std::fs;
use std::process;

use gse_diagnostics::formatter::DiagnosticFormatter;
use gse_diagnostics::json::{to_json_report, to_json_string};
use gse_diagnostics::Diagnostic;

/// How diagnostics are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

/// Which stage produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lex,
    Parse,
    Run,
}

impl Phase {
    fn json_name(self) -> &'static str {
        match self {
            Phase::Lex => "lex",
            Phase::Parse => "parse",
            Phase::Run => "run",
        }
    }

    fn banner_name(self) -> &'static str {
        match self {
            Phase::Lex => "Lex",
            Phase::Parse => "Parse",
            Phase::Run => "Runtime",
        }
    }
}

struct Options {
    file: Option<String>,
    format: Format,
    max_depth: usize,
}

fn main() {
    output::init();
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        help::print_usage();
        return;
    }

    let command = args[1].as_str();
    match command {
        "help" | "--help" | "-h" => {
            help::print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("gse {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {}
    }

    let (command, rest) = match command {
        "lex" | "parse" | "run" => (command, &args[2..]),
        // A bare script path runs it.
        other if other.ends_with(".gse") => ("run", &args[1..]),
        other => {
            eprintln!("{}: unknown command '{}'", output::error_label(), other);
            help::print_usage();
            process::exit(1);
        }
    };

    let opts = match parse_options(rest) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{}: {}", output::error_label(), msg);
            process::exit(1);
        }
    };
    let Some(path) = opts.file.as_deref() else {
        eprintln!("Usage: gse {} <file.gse>", command);
        process::exit(1);
    };

    match command {
        "lex" => commands::phase::cmd_lex(path, opts.format),
        "parse" => commands::phase::cmd_parse(path, opts.format),
        _ => commands::run::cmd_run(path, opts.format, opts.max_depth),
    }
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut opts = Options { file: None, format: Format::Human, max_depth: gse_interp::DEFAULT_MAX_CALL_DEPTH };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => opts.format = Format::Json,
            "--format" => {
                let value = iter.next().ok_or("--format expects 'human' or 'json'")?;
                opts.format = match value.as_str() {
                    "human" => Format::Human,
                    "json" => Format::Json,
                    other => return Err(format!("unknown format '{}', expected 'human' or 'json'", other)),
                };
            }
            "--max-depth" => {
                let value = iter.next().ok_or("--max-depth expects a number")?;
                opts.max_depth =
                    value.parse().map_err(|_| format!("--max-depth expects a number, got '{}'", value))?;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{}'", flag)),
            file => {
                if opts.file.is_some() {
                    return Err(format!("unexpected argument '{}'", file));
                }
                opts.file = Some(file.to_string());
            }
        }
    }
    Ok(opts)
}

/// Enable with `RUST_LOG=gse_interp=debug` or `RUST_LOG=trace`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

pub(crate) fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: cannot read {}: {}", output::error_label(), path, e);
            process::exit(1);
        }
    }
}

/// Print a JSON report on stdout.
pub(crate) fn print_json(diagnostics: &[Diagnostic], source: &str, path: &str, phase: Phase) {
    let report = to_json_report(diagnostics, source, path, phase.json_name());
    println!("{}", to_json_string(&report));
}

/// Report errors in the requested format and exit with status 1.
pub(crate) fn fail(diagnostics: &[Diagnostic], source: &str, path: &str, phase: Phase, format: Format) -> ! {
    match format {
        Format::Human => {
            let formatter = DiagnosticFormatter::new(source).with_file_name(path);
            for diag in diagnostics {
                eprintln!("{}", formatter.format(diag));
            }
            eprintln!("{}", output::banner_fail(phase.banner_name(), diagnostics.len()));
        }
        Format::Json => print_json(diagnostics, source, path, phase),
    }
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn options_in_any_order() {
        let opts = parse_options(&args(&["--max-depth", "12", "game.gse", "--format", "json"])).unwrap();
        assert_eq!(opts.file.as_deref(), Some("game.gse"));
        assert_eq!(opts.format, Format::Json);
        assert_eq!(opts.max_depth, 12);
    }

    #[test]
    fn defaults() {
        let opts = parse_options(&args(&["game.gse"])).unwrap();
        assert_eq!(opts.format, Format::Human);
        assert_eq!(opts.max_depth, gse_interp::DEFAULT_MAX_CALL_DEPTH);
    }

    #[test]
    fn rejects_bad_options() {
        assert!(parse_options(&args(&["a.gse", "--format", "xml"])).is_err());
        assert!(parse_options(&args(&["a.gse", "--max-depth", "deep"])).is_err());
        assert!(parse_options(&args(&["a.gse", "--max-depth"])).is_err());
        assert!(parse_options(&args(&["a.gse", "b.gse"])).is_err());
        assert!(parse_options(&args(&["--verbose"])).is_err());
    }
}
