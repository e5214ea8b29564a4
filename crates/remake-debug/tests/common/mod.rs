#![allow(dead_code)]

use remake_debug::debug::Debugger;
use remake_debug::error::BuildError;
use remake_debug::harness::{Build, BuildGraph, BuildOutcome};
use remake_debug::io::{Output, ScriptedSource};
use remake_debug::Session;

/// Three-level graph: `all` <- `prog` <- (`main.o`, `util.o`).
pub const PROGRAM: &str = r#"
[variables]
CC = "cc"
OBJS = "main.o util.o"

[targets.all]
prerequisites = ["prog"]

[targets.prog]
prerequisites = ["main.o", "util.o"]
recipe = ["$(CC) -o $@ $(OBJS)"]

[targets."main.o"]
recipe = ["$(CC) -c main.c"]

[targets."util.o"]
recipe = ["$(CC) -c util.c"]
"#;

pub struct Run {
    pub result: Result<BuildOutcome, BuildError>,
    pub output: String,
    pub executed: Vec<String>,
    pub graph: BuildGraph,
    pub session: Session,
}

impl Run {
    pub fn outcome(&self) -> BuildOutcome {
        match &self.result {
            Ok(outcome) => *outcome,
            Err(err) => panic!("build failed: {err}"),
        }
    }

    /// Stop banners printed by the debugger, in order.
    pub fn stops(&self) -> Vec<&str> {
        self.output
            .lines()
            .filter(|line| line.starts_with("-> ") || line.starts_with("!! "))
            .collect()
    }
}

/// Build `goals` of `graph` with the debugger reading `commands`.
///
/// Running out of commands while suspended quits the build.
pub fn run_build(
    graph: &str,
    goals: &[&str],
    commands: &[&str],
    configure: impl FnOnce(&mut Session),
) -> Run {
    let mut graph = BuildGraph::from_toml_str(graph).expect("graph");
    let (out, capture) = Output::capture();
    let mut session = Session::new(out.clone());
    session.enabled = true;
    configure(&mut session);
    let mut debugger = Debugger::new(Box::new(ScriptedSource::new(commands.to_vec())), out);
    let mut build = Build::new(&mut graph, &mut session, &mut debugger);
    let result = build.update_goals(goals);
    let executed = build.executed().to_vec();
    drop(build);
    Run {
        result,
        output: capture.contents(),
        executed,
        graph,
        session,
    }
}
