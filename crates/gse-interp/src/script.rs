// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parse-and-run entry point for hosts.

use gse_parser::ParseError;

use crate::context::Context;
use crate::interp::{Interpreter, RuntimeDiagnostic};
use crate::value::Value;

/// Anything that can stop a script from source to result.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Runtime(#[from] RuntimeDiagnostic),
}

/// Parse `source` and run it in `ctx`.
pub fn run_source(interp: &Interpreter, ctx: &Context, source: &str) -> Result<Value, ScriptError> {
    let program = gse_parser::parse(source)?;
    Ok(interp.execute(ctx, &program)?)
}
