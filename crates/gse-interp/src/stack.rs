// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Stack growth for deeply nested evaluation.
//!
//! Script recursion is bounded by the call-depth limit, but each script call
//! costs a variable number of host frames (one per nested block and
//! sub-expression). The evaluator's recursive entry points run through
//! [`ensure_sufficient_stack`], which moves onto a fresh heap-allocated
//! segment when the current one runs low.

/// Grow when less than this is left.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
