// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for the `gse` binary.
//! Each test runs a fixture script and checks exit status and output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn gse(args: &[&str], script: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gse"))
        .args(args)
        .arg(fixture(script))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run gse")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn runs_reference_script() {
    let out = gse(&["run"], "sample.gse");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let expected = "\
undefined
true
true false
true true true false
true false
false true true true
false true false true
true false true true
true
45 -61
52 10
CHILD VALUE
true
{ propertyInt: 372 } { propertyString: \"STRING\", propertyInt1: 150, propertyInt2: 222 }
bye!
";
    assert_eq!(stdout(&out), expected);
}

#[test]
fn bare_path_runs_the_script() {
    let out = Command::new(env!("CARGO_BIN_EXE_gse"))
        .arg(fixture("closures.gse"))
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run gse");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "13 101\n{ name: \"ada\", hp: 18, level: 2 }\n");
}

#[test]
fn runtime_error_is_rendered_with_source() {
    let out = gse(&["run"], "type_mismatch.gse");
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("error[E0302]: operator `+` cannot combine int and string"), "stderr: {}", err);
    assert!(err.contains("type_mismatch.gse:2:"), "stderr: {}", err);
    assert!(err.contains("let b = a + 'oops';"), "stderr: {}", err);
    assert!(err.contains("Runtime FAILED: 1 error"), "stderr: {}", err);
}

#[test]
fn runtime_error_as_json() {
    let out = gse(&["run", "--format", "json"], "type_mismatch.gse");
    assert_eq!(out.status.code(), Some(1));
    let json = stdout(&out);
    assert!(json.contains("\"phase\": \"run\""), "stdout: {}", json);
    assert!(json.contains("\"code\": \"E0302\""), "stdout: {}", json);
    assert!(json.contains("\"success\": false"), "stdout: {}", json);
}

#[test]
fn parse_error_stops_before_running() {
    let out = gse(&["run"], "missing_semicolon.gse");
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("Expected ';' after statement, found 'let'"), "stderr: {}", err);
    assert!(err.contains("missing_semicolon.gse:2:1"), "stderr: {}", err);
    assert!(err.contains("Parse FAILED"), "stderr: {}", err);
    assert_eq!(stdout(&out), "");
}

#[test]
fn parse_command_prints_tree() {
    let out = gse(&["parse"], "closures.gse");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("--- Statement 1 ---"));
    assert!(text.contains("Parse OK"));
}

#[test]
fn lex_command_lists_tokens() {
    let out = gse(&["lex"], "type_mismatch.gse");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Let"));
    assert!(text.contains("String(\"oops\")"));
    assert!(text.contains("Lex OK"));
}

#[test]
fn lex_error_has_lex_code() {
    let out = gse(&["lex", "--json"], "unterminated_string.gse");
    assert_eq!(out.status.code(), Some(1));
    let json = stdout(&out);
    assert!(json.contains("\"phase\": \"lex\""), "stdout: {}", json);
    assert!(json.contains("\"code\": \"E0002\""), "stdout: {}", json);
}

#[test]
fn max_depth_bounds_recursion() {
    let out = gse(&["run", "--max-depth", "16"], "runaway.gse");
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("call depth limit of 16 exceeded"), "stderr: {}", err);
}

#[test]
fn successful_json_run_reports_success() {
    let out = gse(&["run", "--json"], "closures.gse");
    assert!(out.status.success());
    assert!(stdout(&out).contains("\"success\": true"));
}

#[test]
fn unknown_command_fails() {
    let out = Command::new(env!("CARGO_BIN_EXE_gse")).arg("frobnicate").output().expect("failed to run gse");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn missing_file_fails() {
    let out = Command::new(env!("CARGO_BIN_EXE_gse"))
        .args(["run", "no/such/script.gse"])
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run gse");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("cannot read no/such/script.gse"));
}

#[test]
fn version_and_help() {
    let out = Command::new(env!("CARGO_BIN_EXE_gse")).arg("version").output().expect("failed to run gse");
    assert!(out.status.success());
    assert!(stdout(&out).starts_with("gse "));

    let out = Command::new(env!("CARGO_BIN_EXE_gse")).arg("help").output().expect("failed to run gse");
    assert!(out.status.success());
    assert!(stdout(&out).contains("Usage"));
}
