// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Host functions callable from scripts.

use std::fmt;
use std::rc::Rc;

use gse_ast::Span;

use crate::interp::RuntimeError;
use crate::value::Value;

type NativeFn = dyn Fn(&CallSite, Vec<Value>) -> Result<Value, RuntimeError>;

/// Where a native was called from.
#[derive(Debug, Clone, Copy)]
pub struct CallSite {
    pub span: Span,
}

/// A host closure. Arguments arrive already dereferenced.
#[derive(Clone)]
pub struct Native(Rc<NativeFn>);

impl Native {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CallSite, Vec<Value>) -> Result<Value, RuntimeError> + 'static,
    {
        Native(Rc::new(f))
    }

    pub fn invoke(&self, site: &CallSite, args: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.0)(site, args)
    }

    pub fn ptr_eq(&self, other: &Native) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Native")
    }
}

/// Fail with an arity error unless exactly `expected` arguments were passed.
pub fn expect_args(args: &[Value], expected: usize) -> Result<(), RuntimeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArityMismatch { expected, got: args.len() })
    }
}
