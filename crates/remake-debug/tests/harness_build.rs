mod common;

use std::path::Path;

use remake_debug::config::DebugConfig;
use remake_debug::debug::{BuildEngine, Debugger, NoopHook, TraceLevel};
use remake_debug::error::BuildError;
use remake_debug::harness::{Build, BuildGraph, BuildOutcome};
use remake_debug::io::{Output, ScriptedSource};
use remake_debug::{Session, QUIT_EXIT_CODE};

use common::{run_build, PROGRAM};

#[test]
fn trace_levels_gate_and_indent_messages() {
    let run = run_build(PROGRAM, &["all"], &[], |session| {
        session.tracer_mut().set_level(TraceLevel::BASIC);
    });
    assert_eq!(run.outcome(), BuildOutcome::Updated);
    let text = &run.output;
    assert!(text.contains("Considering target 'all'.\n"));
    assert!(text.contains("  Considering target 'main.o'.\n"));
    assert!(text.contains(" Successfully remade target 'prog'.\n"));
    assert!(!text.contains("Finished prerequisites"));
}

#[test]
fn goal_entry_stops_before_each_goal() {
    let run = run_build(PROGRAM, &["main.o", "util.o"], &["c", "c"], |session| {
        session.enter_before_goal = true;
    });
    assert_eq!(run.outcome(), BuildOutcome::Updated);
    assert_eq!(run.stops(), ["!! (goal) main.o", "!! (goal) util.o"]);
}

#[test]
fn fatal_entry_stops_on_missing_rule() {
    let graph = "[targets.all]\nprerequisites = [\"missing.h\"]\n";
    let run = run_build(graph, &[], &["where", "c"], |session| {
        session.enter_on_fatal = true;
    });
    let err = run.result.as_ref().unwrap_err();
    assert!(matches!(err, BuildError::NoRuleNeededBy { .. }));
    assert_eq!(
        run.stops(),
        ["!! (fatal) No rule to make target 'missing.h', needed by 'all'"]
    );
    assert!(run.output.contains("#0  all\n"));
    assert!(run.graph.target_stack().is_empty());
}

#[test]
fn quit_from_fatal_entry_returns_sentinel() {
    let run = run_build(PROGRAM, &["nope"], &["quit"], |session| {
        session.enter_on_fatal = true;
    });
    assert_eq!(run.outcome(), BuildOutcome::Quit(QUIT_EXIT_CODE));
}

#[test]
fn fatal_entry_flags_off_propagate_errors() {
    let run = run_build(PROGRAM, &["nope"], &[], |_| {});
    let err = run.result.as_ref().unwrap_err();
    assert_eq!(err.to_string(), "No rule to make target 'nope'");
    assert!(run.stops().is_empty());
}

#[test]
fn signal_entry_requires_flag() {
    let mut graph = BuildGraph::from_toml_str(PROGRAM).unwrap();
    let (out, capture) = Output::capture();
    let mut session = Session::new(out.clone());
    let mut debugger = Debugger::new(Box::new(ScriptedSource::new(["continue"])), out);

    let mut build = Build::new(&mut graph, &mut session, &mut debugger);
    assert_eq!(build.deliver_signal(2), BuildOutcome::Updated);
    drop(build);
    assert!(capture.take().is_empty());

    session.enter_on_signal = true;
    let mut build = Build::new(&mut graph, &mut session, &mut debugger);
    assert_eq!(build.deliver_signal(2), BuildOutcome::Updated);
    assert_eq!(build.deliver_signal(15), BuildOutcome::Quit(QUIT_EXIT_CODE));
    drop(build);
    let text = capture.contents();
    assert!(text.starts_with("!! (signal 2)\nremake<0> continue\n"));
    assert!(text.contains("!! (signal 15)\n"));
}

#[test]
fn read_makefile_entry_and_missing_file() {
    let mut graph = BuildGraph::new();
    let (out, capture) = Output::capture();
    let mut session = Session::new(out.clone());
    session.enter_before_read = true;
    let mut debugger = Debugger::new(Box::new(ScriptedSource::new(["c"])), out);
    let mut build = Build::new(&mut graph, &mut session, &mut debugger);
    let err = build
        .read_makefile(Path::new("/nonexistent/graph.toml"))
        .unwrap_err();
    assert!(matches!(err, BuildError::Config(_)));
    assert!(capture
        .contents()
        .starts_with("!! (read) /nonexistent/graph.toml\n"));
}

#[test]
fn config_file_settings_drive_the_session() {
    let config = DebugConfig::from_toml_str(
        "[debugger]\nenabled = true\nstep = 3\ntrace = \"basic\"\n",
    )
    .unwrap();
    let mut graph = BuildGraph::from_toml_str(PROGRAM).unwrap();
    let (out, capture) = Output::capture();
    let mut session = config.session(out.clone()).unwrap();
    let mut debugger = Debugger::new(Box::new(ScriptedSource::new(["info trace", "c"])), out);
    let outcome = Build::new(&mut graph, &mut session, &mut debugger)
        .update_goals(&["all"])
        .unwrap();
    assert_eq!(outcome, BuildOutcome::Updated);
    let text = capture.contents();
    assert!(text.contains("-> (step) main.o: before prerequisite check [depth 2]\n"));
    assert!(text.contains("Trace level: basic (0x001)\n"));
}

#[test]
fn noop_hook_builds_everything() {
    let mut graph = BuildGraph::from_toml_str(PROGRAM).unwrap();
    let mut session = Session::new(Output::sink());
    session.enabled = true;
    session.arm_step(1);
    let mut hook = NoopHook;
    let mut build = Build::new(&mut graph, &mut session, &mut hook);
    assert_eq!(build.update_goals::<&str>(&[]).unwrap(), BuildOutcome::Updated);
    assert_eq!(build.executed().len(), 3);
}
