//! Build driver for the CLI.

use anyhow::Context;
use tracing::{debug, info};

use remake_debug::config::{DebugConfig, TraceSetting};
use remake_debug::debug::Debugger;
use remake_debug::harness::{Build, BuildGraph, BuildOutcome};
use remake_debug::io::{Output, StdinSource};

use crate::cli::{Cli, StopOn};
use crate::style;

pub const BUILD_FAILED: i32 = 2;

/// Run the build and return the process exit code.
pub fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = load_config(&cli)?;
    debug!(?config, "debugger configuration");
    let out = Output::stdout();
    let mut session = config.session(out.clone())?;
    if session.enabled {
        println!(
            "{}",
            style::accent("Debugger enabled; type \"help\" at the prompt for commands.")
        );
    }
    let mut debugger = Debugger::new(Box::new(StdinSource), out);
    let mut graph = BuildGraph::new();
    let mut build = Build::new(&mut graph, &mut session, &mut debugger);

    let result = match build.read_makefile(&cli.file) {
        Ok(BuildOutcome::Updated) => build.update_goals(&cli.goals),
        other => other,
    };
    let code = match result {
        Ok(BuildOutcome::Updated) => 0,
        Ok(BuildOutcome::Quit(code)) => {
            info!(code, "quit from debugger");
            code
        }
        Err(err) => {
            eprintln!(
                "{}",
                style::error(format!("remake-debug: *** {err}.  Stop."))
            );
            BUILD_FAILED
        }
    };
    Ok(code)
}

fn load_config(cli: &Cli) -> anyhow::Result<DebugConfig> {
    let mut config = match &cli.config {
        Some(path) => DebugConfig::load(path)
            .with_context(|| format!("loading debugger config {}", path.display()))?,
        None => DebugConfig::default(),
    };
    if cli.debugger {
        config.enabled = true;
        if config.step == 0 && config.next == 0 {
            config.step = 1;
        }
    }
    if let Some(levels) = &cli.debug {
        config.trace = TraceSetting::Text(levels.clone());
    }
    for stop in &cli.debugger_stop {
        config.enabled = true;
        match stop {
            StopOn::Goal => config.enter_before_goal = true,
            StopOn::Preread => config.enter_before_read = true,
            StopOn::Error => config.enter_on_error = true,
            StopOn::Fatal => config.enter_on_fatal = true,
            StopOn::Signal => config.enter_on_signal = true,
        }
    }
    config.trace_level().context("invalid --debug levels")?;
    Ok(config)
}
