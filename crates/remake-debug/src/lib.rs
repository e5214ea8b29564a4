//! `remake-debug` - interactive debugger control plane for a recursive make-style build engine.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Debugger configuration loading.
pub mod config;
/// Debugger core: tracing, breakpoints, commands, and execution control.
pub mod debug;
/// Debugger, configuration, and build errors.
pub mod error;
/// In-memory build engine for driving the debugger.
pub mod harness;
/// Operator input and diagnostic output streams.
pub mod io;
/// Debugger session state.
pub mod session;

pub use session::{ControlState, Session, QUIT_EXIT_CODE};
