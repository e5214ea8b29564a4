//! CLI definitions for remake-debug.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "remake-debug",
    version,
    about = "Build a target graph under an interactive make-style debugger",
    after_help = "Examples:\n  remake-debug -f Remake.toml              # build the first target\n  remake-debug -X all                      # stop at the first event of 'all'\n  remake-debug --debug basic,jobs prog     # trace evaluation\n  remake-debug --debugger-stop error all   # stop when a recipe fails"
)]
pub struct Cli {
    /// Build graph file.
    #[arg(short = 'f', long = "file", value_name = "GRAPH", default_value = "Remake.toml")]
    pub file: PathBuf,
    /// Debugger settings file with a [debugger] table.
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
    /// Enter the debugger at the first build event.
    #[arg(short = 'X', long, action = ArgAction::SetTrue)]
    pub debugger: bool,
    /// Trace categories, e.g. basic,jobs or all.
    #[arg(long = "debug", value_name = "LEVELS")]
    pub debug: Option<String>,
    /// Extra points that enter the debugger (repeatable).
    #[arg(long = "debugger-stop", value_enum, value_name = "WHEN")]
    pub debugger_stop: Vec<StopOn>,
    /// Log debugger internals to stderr.
    #[arg(long, short)]
    pub verbose: bool,
    /// Targets to build; defaults to the first target in the graph.
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StopOn {
    /// Before each goal is updated.
    Goal,
    /// Before the graph file is read.
    Preread,
    /// On any build error.
    Error,
    /// Before a fatal error stops the build.
    Fatal,
    /// When a signal is delivered.
    Signal,
}
