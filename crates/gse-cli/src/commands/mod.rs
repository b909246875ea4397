// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command implementations.

pub mod phase;
pub mod run;
