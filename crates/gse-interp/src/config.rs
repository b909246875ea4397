// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Interpreter settings.

/// Default bound on nested script function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Script calls nested deeper than this fail with a call-depth error.
    /// The host stack grows on demand, so the limit bounds memory rather
    /// than guarding a fixed stack.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

impl InterpreterConfig {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}
