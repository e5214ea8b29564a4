//! Debugging and tracing support.

#![allow(missing_docs)]

mod breakpoints;
pub mod command;
mod control;
mod engine;
mod hook;
mod resolve;
mod trace;
mod types;

pub use breakpoints::{Breakpoint, Breakpoints};
pub use control::Debugger;
pub use engine::{BuildEngine, Scope, VariableOrigin};
pub use hook::{BuildHook, NoopHook};
pub use resolve::{parse_event_options, resolve_target, EventOptions};
pub use trace::{TraceLevel, Tracer};
pub use types::{BreakpointMask, EventPoint, Flow, Stop, StopReason, TargetId};
