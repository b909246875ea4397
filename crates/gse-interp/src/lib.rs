// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk interpreter for game scripts.
//!
//! The host owns a [`Context`], registers natives in it, and hands it to
//! an [`Interpreter`] together with a parsed program:
//!
//! ```
//! use gse_interp::{run_source, Context, Interpreter, Value};
//!
//! let ctx = Context::new();
//! let interp = Interpreter::new();
//! let result = run_source(&interp, &ctx, "let a = 2; return a * 21;").unwrap();
//! assert_eq!(result, Value::Int(42));
//! ctx.teardown();
//! ```

mod config;
mod context;
mod interp;
mod native;
mod script;
mod stack;
mod value;

pub use config::{InterpreterConfig, DEFAULT_MAX_CALL_DEPTH};
pub use context::Context;
pub use interp::{Interpreter, RuntimeDiagnostic, RuntimeError};
pub use native::{expect_args, CallSite, Native};
pub use script::{run_source, ScriptError};
pub use value::{Callable, Function, Object, ObjectRef, Value};
