//! Build event hook trait.

#![allow(missing_docs)]

use std::path::Path;

use crate::session::Session;

use super::{BuildEngine, EventPoint, Flow, TargetId};

/// Callbacks the engine invokes at build-graph event points.
///
/// Every method returns a [`Flow`]; the engine must stop evaluation and
/// return `Flow::Quit` from each recursive frame once it sees one.
pub trait BuildHook {
    /// Called at every target event point.
    fn on_target_event(
        &mut self,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        target: TargetId,
        event: EventPoint,
        depth: u32,
    ) -> Flow;

    /// Called before the target's prerequisites are checked.
    fn on_before_prereq(
        &mut self,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        target: TargetId,
        depth: u32,
    ) -> Flow {
        self.on_target_event(session, engine, target, EventPoint::BeforePrereq, depth)
    }

    /// Called after the target's prerequisites are up to date.
    fn on_after_prereq(
        &mut self,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        target: TargetId,
        depth: u32,
    ) -> Flow {
        self.on_target_event(session, engine, target, EventPoint::AfterPrereq, depth)
    }

    /// Called after the target's recipe has run.
    fn on_after_command(
        &mut self,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        target: TargetId,
        depth: u32,
    ) -> Flow {
        self.on_target_event(session, engine, target, EventPoint::AfterCommand, depth)
    }

    /// Called when the engine reports a recoverable error.
    fn on_error(
        &mut self,
        session: &mut Session,
        _engine: &mut dyn BuildEngine,
        _target: Option<TargetId>,
        _message: &str,
        _depth: u32,
    ) -> Flow {
        session.flow()
    }

    /// Called before the engine takes its fatal error path.
    fn on_fatal_error(
        &mut self,
        session: &mut Session,
        _engine: &mut dyn BuildEngine,
        _message: &str,
    ) -> Flow {
        session.flow()
    }

    /// Called when the engine receives a signal.
    fn on_signal(
        &mut self,
        session: &mut Session,
        _engine: &mut dyn BuildEngine,
        _signal: i32,
    ) -> Flow {
        session.flow()
    }

    /// Called before a goal target is updated.
    fn on_before_goal_update(
        &mut self,
        session: &mut Session,
        _engine: &mut dyn BuildEngine,
        _goal: TargetId,
    ) -> Flow {
        session.flow()
    }

    /// Called before a makefile is read.
    fn on_before_read_makefile(
        &mut self,
        session: &mut Session,
        _engine: &mut dyn BuildEngine,
        _path: &Path,
    ) -> Flow {
        session.flow()
    }
}

/// Hook that never suspends.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl BuildHook for NoopHook {
    fn on_target_event(
        &mut self,
        session: &mut Session,
        _engine: &mut dyn BuildEngine,
        _target: TargetId,
        _event: EventPoint,
        _depth: u32,
    ) -> Flow {
        session.flow()
    }
}
