//! Debugger, configuration, and build errors.

#![allow(missing_docs)]

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

/// Operator-facing errors raised while handling debugger commands.
///
/// All of these are recoverable: the read loop reports them and prompts again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DebugError {
    /// No command matches the input word.
    #[error("undefined command \"{0}\"; try \"help\"")]
    UnknownCommand(SmolStr),

    /// The input word is a prefix of more than one command.
    #[error("ambiguous command \"{input}\": {}", .candidates.join(", "))]
    AmbiguousCommand {
        input: SmolStr,
        candidates: Vec<SmolStr>,
    },

    /// Target name did not resolve in the current scope.
    #[error("Can't find target {0}; breakpoint not set.")]
    UnknownTarget(SmolStr),

    /// Unrecognized breakpoint event modifier.
    #[error(
        "unknown breakpoint modifier {0}; should be 'all', 'prereq', 'before', 'run', 'end' or 'temp'"
    )]
    InvalidBreakpointOption(SmolStr),

    /// Breakpoint would not stop at any event.
    #[error("breakpoint event mask is empty")]
    EmptyBreakpointMask,

    /// No breakpoint is installed for the target.
    #[error("no breakpoint set on target {0}")]
    NoBreakpoint(SmolStr),

    /// Argument could not be parsed.
    #[error("invalid argument '{0}'")]
    InvalidArgument(SmolStr),

    /// Required argument is missing.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// Operator input could not be read.
    #[error("i/o error: {0}")]
    Io(SmolStr),
}

impl From<std::io::Error> for DebugError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string().into())
    }
}

/// Errors loading debugger configuration or build graph files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML document is malformed or has unexpected fields.
    #[error("invalid config: {0}")]
    Parse(String),

    /// Unknown trace category name.
    #[error("unknown trace level '{0}'")]
    UnknownTraceLevel(SmolStr),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Errors that stop the harness build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A goal has no rule.
    #[error("No rule to make target '{0}'")]
    NoRule(SmolStr),

    /// A prerequisite has no rule.
    #[error("No rule to make target '{target}', needed by '{needed_by}'")]
    NoRuleNeededBy { target: SmolStr, needed_by: SmolStr },

    /// No goal was given and the graph defines no targets.
    #[error("No targets")]
    NoTargets,

    /// A recipe reported failure.
    #[error("recipe for target '{target}' failed")]
    RecipeFailed { target: SmolStr },

    /// Graph file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
