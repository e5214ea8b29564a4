//! Execution controller: decides when to suspend and runs the command loop.

#![allow(missing_docs)]

use std::path::Path;

use tracing::{debug, warn};

use crate::error::DebugError;
use crate::io::{LineSource, Output};
use crate::session::{ControlState, Session};

use super::command::{dispatch, CommandContext, CommandStatus, CommandTable};
use super::hook::BuildHook;
use super::{Breakpoints, BuildEngine, EventPoint, Flow, Stop, StopReason, TargetId};

/// Interactive debugger attached to a build as its [`BuildHook`].
///
/// Suspension runs the command read loop synchronously inside the hook
/// call, so resuming simply returns to the engine's call site with its
/// recursion intact.
pub struct Debugger {
    breakpoints: Breakpoints,
    commands: CommandTable,
    input: Box<dyn LineSource>,
    out: Output,
}

impl Debugger {
    /// Debugger reading commands from `input` and writing to `out`.
    #[must_use]
    pub fn new(input: Box<dyn LineSource>, out: Output) -> Self {
        Self {
            breakpoints: Breakpoints::new(),
            commands: CommandTable::standard(),
            input,
            out,
        }
    }

    #[must_use]
    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    fn enter_on(
        &mut self,
        enabled: bool,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        stop: Stop,
    ) -> Flow {
        if session.is_quit() {
            return session.flow();
        }
        if !enabled {
            return Flow::Continue;
        }
        // Commands issued from an entry stop must be able to stop again.
        session.enabled = true;
        self.suspend(session, engine, &stop)
    }

    fn suspend(&mut self, session: &mut Session, engine: &mut dyn BuildEngine, stop: &Stop) -> Flow {
        session.reset_stepping();
        session.set_state(ControlState::Suspended);
        debug!(reason = %stop.reason, depth = stop.depth, "debugger suspended");
        self.print_stop(&*engine, stop);

        loop {
            let prompt = format!("remake<{}> ", session.commands_read());
            let line = match self.input.read_line(&prompt, &self.out) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.out.write_line("");
                    return session.request_quit();
                }
                Err(err) => {
                    warn!(error = %err, "failed to read debugger command");
                    self.out.error(&DebugError::from(err).to_string());
                    return session.request_quit();
                }
            };
            session.count_command();
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut ctx = CommandContext {
                session: &mut *session,
                breakpoints: &mut self.breakpoints,
                engine: &mut *engine,
                out: &self.out,
                table: &self.commands,
                stop,
            };
            match dispatch(&mut ctx, line) {
                Ok(CommandStatus::Ok) => {}
                Ok(
                    CommandStatus::ResumeContinue
                    | CommandStatus::ResumeStep
                    | CommandStatus::ResumeNext,
                ) => {
                    session.set_state(ControlState::Running);
                    debug!("debugger resumed");
                    return Flow::Continue;
                }
                Ok(CommandStatus::Quit) => return session.request_quit(),
                Err(err) => self.out.error(&err.to_string()),
            }
        }
    }

    fn print_stop(&self, engine: &dyn BuildEngine, stop: &Stop) {
        let name = stop
            .target
            .and_then(|target| engine.target_name(target))
            .unwrap_or_default();
        let banner = match stop.event {
            Some(event) => format!(
                "-> ({}) {name}: {event} [depth {}]",
                stop.reason, stop.depth
            ),
            None => {
                let mut text = format!("!! ({})", stop.reason);
                if !name.is_empty() {
                    text.push(' ');
                    text.push_str(&name);
                    if stop.detail.is_some() {
                        text.push(':');
                    }
                }
                if let Some(detail) = &stop.detail {
                    text.push(' ');
                    text.push_str(detail);
                }
                text
            }
        };
        self.out.banner(&banner);
    }
}

impl BuildHook for Debugger {
    fn on_target_event(
        &mut self,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        target: TargetId,
        event: EventPoint,
        depth: u32,
    ) -> Flow {
        if session.is_quit() {
            return session.flow();
        }
        if !session.enabled {
            return Flow::Continue;
        }
        let matched = self.breakpoints.match_event(target, event);
        let stepped = session.take_step_trigger();
        let nexted = session.take_next_trigger(depth);
        let reason = if !matched.is_empty() {
            StopReason::Breakpoint
        } else if stepped {
            StopReason::Step
        } else if nexted {
            StopReason::Next
        } else {
            return Flow::Continue;
        };
        self.suspend(session, engine, &Stop::at_event(reason, target, event, depth))
    }

    fn on_error(
        &mut self,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        target: Option<TargetId>,
        message: &str,
        depth: u32,
    ) -> Flow {
        let stop = Stop::entry(StopReason::Error, target, depth).with_detail(message);
        self.enter_on(session.enter_on_error, session, engine, stop)
    }

    fn on_fatal_error(
        &mut self,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        message: &str,
    ) -> Flow {
        let enabled = session.enter_on_fatal || session.enter_on_error;
        let stop = Stop::entry(StopReason::Fatal, None, 0).with_detail(message);
        self.enter_on(enabled, session, engine, stop)
    }

    fn on_signal(&mut self, session: &mut Session, engine: &mut dyn BuildEngine, signal: i32) -> Flow {
        let stop = Stop::entry(StopReason::Signal(signal), None, 0);
        self.enter_on(session.enter_on_signal, session, engine, stop)
    }

    fn on_before_goal_update(
        &mut self,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        goal: TargetId,
    ) -> Flow {
        let stop = Stop::entry(StopReason::Goal, Some(goal), 0);
        self.enter_on(session.enter_before_goal, session, engine, stop)
    }

    fn on_before_read_makefile(
        &mut self,
        session: &mut Session,
        engine: &mut dyn BuildEngine,
        path: &Path,
    ) -> Flow {
        let stop = Stop::entry(StopReason::ReadMakefile, None, 0)
            .with_detail(path.display().to_string());
        self.enter_on(session.enter_before_read, session, engine, stop)
    }
}
