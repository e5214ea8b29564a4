//! Minimal build engine for driving the debugger in tests and the CLI.

#![allow(missing_docs)]

mod eval;
mod graph;
mod load;

pub use eval::{Build, BuildOutcome};
pub use graph::{BuildGraph, TargetRule, Variable};
