//! Debug data types.

#![allow(missing_docs)]

use std::fmt;

use bitflags::bitflags;

/// Canonical identity of a build target, issued once per run by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

bitflags! {
    /// Build-graph events a breakpoint stops at.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BreakpointMask: u8 {
        /// Before the target's prerequisites are checked.
        const BEFORE_PREREQ = 0x01;
        /// After prerequisites are checked, before the recipe runs.
        const AFTER_PREREQ = 0x02;
        /// After the recipe has run.
        const AFTER_CMD = 0x04;
        /// Every event.
        const ALL = Self::BEFORE_PREREQ.bits() | Self::AFTER_PREREQ.bits() | Self::AFTER_CMD.bits();
    }
}

impl BreakpointMask {
    /// Short names of the events in the mask, in evaluation order.
    #[must_use]
    pub fn describe(self) -> String {
        if self == Self::ALL {
            return "all".to_string();
        }
        let names: Vec<&str> = EventPoint::ALL
            .iter()
            .filter(|event| self.contains(event.mask()))
            .map(|event| event.short_name())
            .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(",")
        }
    }
}

/// Point in target evaluation where the engine calls into the debugger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventPoint {
    BeforePrereq,
    AfterPrereq,
    AfterCommand,
}

impl EventPoint {
    /// Every event point, in evaluation order.
    pub const ALL: [EventPoint; 3] = [
        EventPoint::BeforePrereq,
        EventPoint::AfterPrereq,
        EventPoint::AfterCommand,
    ];

    /// The breakpoint bit matching this event.
    #[must_use]
    pub fn mask(self) -> BreakpointMask {
        match self {
            EventPoint::BeforePrereq => BreakpointMask::BEFORE_PREREQ,
            EventPoint::AfterPrereq => BreakpointMask::AFTER_PREREQ,
            EventPoint::AfterCommand => BreakpointMask::AFTER_CMD,
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            EventPoint::BeforePrereq => "before",
            EventPoint::AfterPrereq => "prereq",
            EventPoint::AfterCommand => "run",
        }
    }
}

impl fmt::Display for EventPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EventPoint::BeforePrereq => "before prerequisite check",
            EventPoint::AfterPrereq => "after prerequisite check",
            EventPoint::AfterCommand => "after command",
        };
        f.write_str(text)
    }
}

/// Decision returned to the engine from every hook call.
///
/// `Quit` must be propagated out of every recursive evaluation frame.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit(i32),
}

impl Flow {
    #[must_use]
    pub fn is_quit(self) -> bool {
        matches!(self, Flow::Quit(_))
    }
}

/// Why the debugger took control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Breakpoint,
    Step,
    Next,
    Error,
    Fatal,
    Signal(i32),
    Goal,
    ReadMakefile,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Breakpoint => f.write_str("breakpoint"),
            StopReason::Step => f.write_str("step"),
            StopReason::Next => f.write_str("next"),
            StopReason::Error => f.write_str("error"),
            StopReason::Fatal => f.write_str("fatal"),
            StopReason::Signal(signal) => write!(f, "signal {signal}"),
            StopReason::Goal => f.write_str("goal"),
            StopReason::ReadMakefile => f.write_str("read"),
        }
    }
}

/// Where and why execution is suspended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub reason: StopReason,
    pub target: Option<TargetId>,
    pub event: Option<EventPoint>,
    /// Recursion depth of the suspended evaluation (0 for goals).
    pub depth: u32,
    /// Error text or makefile path for entry stops.
    pub detail: Option<String>,
}

impl Stop {
    /// Stop at a target event point.
    #[must_use]
    pub fn at_event(reason: StopReason, target: TargetId, event: EventPoint, depth: u32) -> Self {
        Self {
            reason,
            target: Some(target),
            event: Some(event),
            depth,
            detail: None,
        }
    }

    /// Stop on an entry condition.
    #[must_use]
    pub fn entry(reason: StopReason, target: Option<TargetId>, depth: u32) -> Self {
        Self {
            reason,
            target,
            event: None,
            depth,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_description_lists_events() {
        assert_eq!(BreakpointMask::ALL.describe(), "all");
        assert_eq!(
            (BreakpointMask::BEFORE_PREREQ | BreakpointMask::AFTER_CMD).describe(),
            "before,run"
        );
        assert_eq!(BreakpointMask::empty().describe(), "none");
    }
}
