//! Depth-first goal evaluation with debugger hooks.

#![allow(missing_docs)]

use std::path::Path;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::debug;

use crate::debug::{BuildEngine, BuildHook, Flow, Scope, TargetId, TraceLevel};
use crate::error::BuildError;
use crate::io::Output;
use crate::session::Session;

use super::BuildGraph;

/// How a build run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// All goals were brought up to date.
    Updated,
    /// The operator quit from the debugger.
    Quit(i32),
}

impl From<Flow> for BuildOutcome {
    fn from(flow: Flow) -> Self {
        match flow {
            Flow::Continue => Self::Updated,
            Flow::Quit(code) => Self::Quit(code),
        }
    }
}

type Step = Result<Flow, BuildError>;

macro_rules! check {
    ($flow:expr) => {
        if let Flow::Quit(code) = $flow {
            return Ok(Flow::Quit(code));
        }
    };
}

/// One build run over a [`BuildGraph`].
pub struct Build<'a> {
    graph: &'a mut BuildGraph,
    session: &'a mut Session,
    hook: &'a mut dyn BuildHook,
    out: Output,
    updated: FxHashSet<TargetId>,
    executed: Vec<String>,
}

impl<'a> Build<'a> {
    pub fn new(
        graph: &'a mut BuildGraph,
        session: &'a mut Session,
        hook: &'a mut dyn BuildHook,
    ) -> Self {
        let out = session.tracer().output().clone();
        Self {
            graph,
            session,
            hook,
            out,
            updated: FxHashSet::default(),
            executed: Vec::new(),
        }
    }

    /// Expanded recipe lines run so far, in order.
    #[must_use]
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    #[must_use]
    pub fn graph(&self) -> &BuildGraph {
        &*self.graph
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &*self.session
    }

    /// Read a graph file into the build, offering the debugger a stop first.
    pub fn read_makefile(&mut self, path: &Path) -> Result<BuildOutcome, BuildError> {
        let flow = self
            .hook
            .on_before_read_makefile(self.session, &mut *self.graph, path);
        if let Flow::Quit(code) = flow {
            return Ok(BuildOutcome::Quit(code));
        }
        self.session.trace(
            TraceLevel::READ_MAKEFILES,
            &format!("Reading makefile '{}'...", path.display()),
            0,
        );
        self.graph.read_file(path)?;
        Ok(BuildOutcome::Updated)
    }

    /// Update each goal in order; no goals means the first target.
    pub fn update_goals<S: AsRef<str>>(&mut self, goals: &[S]) -> Result<BuildOutcome, BuildError> {
        let mut ids = Vec::with_capacity(goals.len());
        for goal in goals {
            let name = goal.as_ref();
            match self.graph.lookup_target(name) {
                Some(id) => ids.push(id),
                None => {
                    let err = BuildError::NoRule(SmolStr::new(name));
                    return self.fatal(err).map(BuildOutcome::from);
                }
            }
        }
        if ids.is_empty() {
            match self.graph.first_target() {
                Some(id) => ids.push(id),
                None => return self.fatal(BuildError::NoTargets).map(BuildOutcome::from),
            }
        }

        for goal in ids {
            let flow = self
                .hook
                .on_before_goal_update(self.session, &mut *self.graph, goal);
            if let Flow::Quit(code) = flow {
                return Ok(BuildOutcome::Quit(code));
            }
            self.session
                .trace(TraceLevel::UPDATE_GOAL, &format!("Updating goal '{}'.", self.name(goal)), 0);
            if let Flow::Quit(code) = self.update_target(goal, 0)? {
                return Ok(BuildOutcome::Quit(code));
            }
        }
        Ok(BuildOutcome::Updated)
    }

    /// Report a signal to the debugger.
    pub fn deliver_signal(&mut self, signal: i32) -> BuildOutcome {
        debug!(signal, "signal delivered to build");
        self.hook
            .on_signal(self.session, &mut *self.graph, signal)
            .into()
    }

    fn update_target(&mut self, target: TargetId, depth: u32) -> Step {
        if self.updated.contains(&target) {
            self.session.trace(
                TraceLevel::VERBOSE,
                &format!("Target '{}' was considered already.", self.name(target)),
                depth,
            );
            return Ok(Flow::Continue);
        }
        self.graph.push_target(target);
        let result = self.update_pushed(target, depth);
        self.graph.pop_target(target);
        if matches!(result, Ok(Flow::Continue)) {
            self.updated.insert(target);
        }
        result
    }

    fn update_pushed(&mut self, target: TargetId, depth: u32) -> Step {
        let name = self.name(target);
        debug!(target = %name, depth, "considering target");
        self.session
            .tracer()
            .emit_with(TraceLevel::BASIC, depth, || format!("Considering target '{name}'."));

        check!(self
            .hook
            .on_before_prereq(self.session, &mut *self.graph, target, depth));

        let prerequisites = self
            .graph
            .rule(target)
            .map(|rule| rule.prerequisites.clone())
            .unwrap_or_default();
        for prerequisite in prerequisites {
            let expanded = self
                .graph
                .expand_variables(&prerequisite, Scope::Target(target));
            let Some(child) = self.graph.lookup_target(expanded.trim()) else {
                let err = BuildError::NoRuleNeededBy {
                    target: SmolStr::new(expanded.trim()),
                    needed_by: name.clone(),
                };
                return self.fatal(err);
            };
            if self.graph.is_in_progress(child) {
                let message = format!(
                    "Circular {name} <- {} dependency dropped.",
                    self.name(child)
                );
                self.out.error(&message);
                check!(self.hook.on_error(
                    self.session,
                    &mut *self.graph,
                    Some(target),
                    &message,
                    depth
                ));
                continue;
            }
            check!(self.update_target(child, depth + 1)?);
        }

        self.session.trace(
            TraceLevel::VERBOSE,
            &format!("Finished prerequisites of target '{name}'."),
            depth,
        );
        check!(self
            .hook
            .on_after_prereq(self.session, &mut *self.graph, target, depth));

        check!(self.run_recipe(target, &name, depth)?);

        check!(self
            .hook
            .on_after_command(self.session, &mut *self.graph, target, depth));
        self.session.trace(
            TraceLevel::BASIC,
            &format!("Successfully remade target '{name}'."),
            depth,
        );
        Ok(Flow::Continue)
    }

    fn run_recipe(&mut self, target: TargetId, name: &SmolStr, depth: u32) -> Step {
        let Some(rule) = self.graph.rule(target) else {
            return Ok(Flow::Continue);
        };
        let fails = rule.fails;
        let lines: Vec<String> = rule
            .recipe
            .iter()
            .map(|line| self.graph.expand_variables(line, Scope::Target(target)))
            .collect();
        if !lines.is_empty() {
            self.session.trace(
                TraceLevel::JOBS,
                &format!("Running recipe for target '{name}'."),
                depth,
            );
        }
        for line in lines {
            self.out.write_line(&line);
            self.executed.push(line);
        }
        if !fails {
            return Ok(Flow::Continue);
        }

        let err = BuildError::RecipeFailed {
            target: name.clone(),
        };
        let message = err.to_string();
        self.out.error(&message);
        check!(self.hook.on_error(
            self.session,
            &mut *self.graph,
            Some(target),
            &message,
            depth
        ));
        self.fatal(err)
    }

    /// Offer the debugger the fatal error, then fail unless it quit.
    fn fatal(&mut self, err: BuildError) -> Step {
        let message = err.to_string();
        debug!(error = %message, "fatal build error");
        check!(self
            .hook
            .on_fatal_error(self.session, &mut *self.graph, &message));
        Err(err)
    }

    fn name(&self, target: TargetId) -> SmolStr {
        self.graph.target_name(target).unwrap_or_default()
    }
}
