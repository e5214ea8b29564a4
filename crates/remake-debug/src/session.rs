//! Debugger session state shared across the engine/debugger boundary.

#![allow(missing_docs)]

use tracing::debug;

use crate::debug::{Flow, TraceLevel, Tracer};
use crate::io::Output;

/// Exit status used when the operator quits from the debugger.
pub const QUIT_EXIT_CODE: i32 = 77;

/// Execution controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Build evaluation is running.
    Running,
    /// The command read loop owns control.
    Suspended,
    /// The operator quit; terminal.
    Quit,
}

/// Flags, counters, and trace settings for one build run.
///
/// The engine owns the session and hands it to every hook call. Flags are
/// written at startup and by the `set` command; counters by the resume
/// commands.
#[derive(Debug, Clone)]
pub struct Session {
    /// Target event points may suspend execution.
    pub enabled: bool,
    /// Enter the debugger on any reported error.
    pub enter_on_error: bool,
    /// Enter the debugger before the fatal error path.
    pub enter_on_fatal: bool,
    /// Enter the debugger when a signal is delivered.
    pub enter_on_signal: bool,
    /// Enter the debugger before each goal target is updated.
    pub enter_before_goal: bool,
    /// Enter the debugger before a makefile is read.
    pub enter_before_read: bool,
    step_count: u32,
    next_count: u32,
    next_depth: u32,
    tracer: Tracer,
    state: ControlState,
    quit_code: Option<i32>,
    commands_read: u32,
}

impl Session {
    /// A disabled session with tracing off.
    #[must_use]
    pub fn new(out: Output) -> Self {
        Self {
            enabled: false,
            enter_on_error: false,
            enter_on_fatal: false,
            enter_on_signal: false,
            enter_before_goal: false,
            enter_before_read: false,
            step_count: 0,
            next_count: 0,
            next_depth: 0,
            tracer: Tracer::new(TraceLevel::empty(), out),
            state: ControlState::Running,
            quit_code: None,
            commands_read: 0,
        }
    }

    #[must_use]
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Shorthand for [`Tracer::emit`].
    pub fn trace(&self, category: TraceLevel, message: &str, indent: u32) {
        self.tracer.emit(category, message, indent);
    }

    #[must_use]
    pub fn state(&self) -> ControlState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ControlState) {
        assert!(
            self.state != ControlState::Quit || state == ControlState::Quit,
            "debugger session cannot leave the quit state"
        );
        self.state = state;
    }

    #[must_use]
    pub fn is_quit(&self) -> bool {
        self.state == ControlState::Quit
    }

    #[must_use]
    pub fn quit_code(&self) -> Option<i32> {
        self.quit_code
    }

    /// Enter the terminal quit state.
    pub fn request_quit(&mut self) -> Flow {
        debug!("debugger quit requested");
        self.state = ControlState::Quit;
        let code = *self.quit_code.get_or_insert(QUIT_EXIT_CODE);
        Flow::Quit(code)
    }

    /// `Flow::Quit` once the session has quit, `Flow::Continue` otherwise.
    pub fn flow(&self) -> Flow {
        match self.quit_code {
            Some(code) if self.is_quit() => Flow::Quit(code),
            _ => Flow::Continue,
        }
    }

    #[must_use]
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    #[must_use]
    pub fn next_count(&self) -> u32 {
        self.next_count
    }

    #[must_use]
    pub fn next_depth(&self) -> u32 {
        self.next_depth
    }

    /// Suspend at the `count`-th event from now, at any depth.
    pub fn arm_step(&mut self, count: u32) {
        self.step_count = count;
        self.next_count = 0;
    }

    /// Suspend at the `count`-th event from now whose depth is at most `depth`.
    pub fn arm_next(&mut self, count: u32, depth: u32) {
        self.next_count = count;
        self.next_depth = depth;
        self.step_count = 0;
    }

    /// Disarm step and next.
    pub fn reset_stepping(&mut self) {
        self.step_count = 0;
        self.next_count = 0;
    }

    /// Count one event against the step counter; true when it should suspend.
    pub(crate) fn take_step_trigger(&mut self) -> bool {
        match self.step_count {
            0 => false,
            1 => {
                self.step_count = 0;
                true
            }
            _ => {
                self.step_count -= 1;
                false
            }
        }
    }

    /// Count one event at `depth` against the next counter.
    ///
    /// Events deeper than the armed depth are not counted.
    pub(crate) fn take_next_trigger(&mut self, depth: u32) -> bool {
        if self.next_count == 0 || depth > self.next_depth {
            return false;
        }
        if self.next_count == 1 {
            self.next_count = 0;
            return true;
        }
        self.next_count -= 1;
        false
    }

    #[must_use]
    pub fn commands_read(&self) -> u32 {
        self.commands_read
    }

    pub(crate) fn count_command(&mut self) {
        self.commands_read = self.commands_read.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_counter_fires_on_nth_event() {
        let mut session = Session::new(Output::sink());
        session.arm_step(3);
        assert!(!session.take_step_trigger());
        assert!(!session.take_step_trigger());
        assert!(session.take_step_trigger());
        assert!(!session.take_step_trigger());
        assert_eq!(session.step_count(), 0);
    }

    #[test]
    fn next_counter_ignores_deeper_events() {
        let mut session = Session::new(Output::sink());
        session.arm_next(1, 1);
        assert!(!session.take_next_trigger(2));
        assert!(!session.take_next_trigger(5));
        assert_eq!(session.next_count(), 1);
        assert!(session.take_next_trigger(1));
        assert_eq!(session.next_count(), 0);
    }

    #[test]
    fn arming_one_mode_disarms_the_other() {
        let mut session = Session::new(Output::sink());
        session.arm_step(2);
        session.arm_next(1, 0);
        assert_eq!(session.step_count(), 0);
        session.arm_step(1);
        assert_eq!(session.next_count(), 0);
    }

    #[test]
    fn quit_is_sticky() {
        let mut session = Session::new(Output::sink());
        assert_eq!(session.flow(), Flow::Continue);
        assert_eq!(session.request_quit(), Flow::Quit(QUIT_EXIT_CODE));
        assert!(session.is_quit());
        assert_eq!(session.flow(), Flow::Quit(QUIT_EXIT_CODE));
        assert_eq!(session.quit_code(), Some(QUIT_EXIT_CODE));
    }

    #[test]
    #[should_panic(expected = "cannot leave the quit state")]
    fn resuming_after_quit_is_a_bug() {
        let mut session = Session::new(Output::sink());
        let _ = session.request_quit();
        session.set_state(ControlState::Running);
    }
}
