//! Debugger command table and dispatcher.
//! - CommandTable: registered commands, resolved by name, alias, or unique prefix
//! - dispatch: run one operator line against the table

#![allow(missing_docs)]

mod breakpoints;
mod info;
mod run_control;
mod set;

use smol_str::SmolStr;
use tracing::debug;

use crate::error::DebugError;
use crate::io::Output;
use crate::session::Session;

use super::{Breakpoints, BuildEngine, Stop};

/// What the read loop does after a command succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Stay in the read loop.
    Ok,
    /// Leave the loop and run freely.
    ResumeContinue,
    /// Leave the loop with step armed.
    ResumeStep,
    /// Leave the loop with next armed.
    ResumeNext,
    /// Terminate with the quit sentinel.
    Quit,
}

/// Handler result; errors are reported and the loop continues.
pub type CommandResult = Result<CommandStatus, DebugError>;

pub type CommandHandler = fn(&mut CommandContext<'_>, &str) -> CommandResult;

/// Everything a command handler may inspect or change.
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub breakpoints: &'a mut Breakpoints,
    pub engine: &'a mut dyn BuildEngine,
    pub out: &'a Output,
    pub table: &'a CommandTable,
    pub stop: &'a Stop,
}

/// A registered command.
#[derive(Debug, Clone, Copy)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub handler: CommandHandler,
    pub usage: &'static str,
    pub doc: &'static str,
}

/// Commands known to the read loop, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: Vec<CommandDescriptor>,
}

impl CommandTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard debugger command set.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        breakpoints::register(&mut table);
        info::register(&mut table);
        run_control::register(&mut table);
        set::register(&mut table);
        table
    }

    /// Add a command.
    ///
    /// # Panics
    ///
    /// Panics if the name or an alias is already taken.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        for word in std::iter::once(descriptor.name).chain(descriptor.aliases.iter().copied()) {
            assert!(
                self.lookup_exact(word).is_none(),
                "debugger command '{word}' registered twice"
            );
        }
        let index = self
            .commands
            .partition_point(|existing| existing.name < descriptor.name);
        self.commands.insert(index, descriptor);
    }

    /// Resolve an input word: exact name or alias first, then a unique prefix
    /// of a command name.
    pub fn resolve(&self, word: &str) -> Result<&CommandDescriptor, DebugError> {
        if let Some(descriptor) = self.lookup_exact(word) {
            return Ok(descriptor);
        }
        let candidates: Vec<&CommandDescriptor> = self
            .commands
            .iter()
            .filter(|descriptor| descriptor.name.starts_with(word))
            .collect();
        match candidates.as_slice() {
            [] => Err(DebugError::UnknownCommand(SmolStr::new(word))),
            [descriptor] => Ok(descriptor),
            many => Err(DebugError::AmbiguousCommand {
                input: SmolStr::new(word),
                candidates: many
                    .iter()
                    .map(|descriptor| SmolStr::new_static(descriptor.name))
                    .collect(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn lookup_exact(&self, word: &str) -> Option<&CommandDescriptor> {
        self.commands
            .iter()
            .find(|descriptor| {
                descriptor.name == word || descriptor.aliases.iter().any(|alias| *alias == word)
            })
    }
}

/// Run one operator line.
///
/// # Panics
///
/// Panics if the session has already quit.
pub fn dispatch(ctx: &mut CommandContext<'_>, line: &str) -> CommandResult {
    assert!(
        !ctx.session.is_quit(),
        "debugger command dispatched after quit"
    );
    let (word, args) = split_word(line);
    if word.is_empty() {
        return Ok(CommandStatus::Ok);
    }
    let descriptor = ctx.table.resolve(word)?;
    debug!(command = descriptor.name, args, "dispatching debugger command");
    (descriptor.handler)(ctx, args)
}

/// Split off the first whitespace-delimited word.
pub(crate) fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim_start()),
        None => (text, ""),
    }
}

/// Parse an optional positive repeat count.
pub(crate) fn parse_count(args: &str) -> Result<u32, DebugError> {
    let (word, rest) = split_word(args);
    if !rest.is_empty() {
        return Err(DebugError::InvalidArgument(SmolStr::new(rest)));
    }
    if word.is_empty() {
        return Ok(1);
    }
    match word.parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(DebugError::InvalidArgument(SmolStr::new(word))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_ctx: &mut CommandContext<'_>, _args: &str) -> CommandResult {
        Ok(CommandStatus::Ok)
    }

    fn descriptor(name: &'static str, aliases: &'static [&'static str]) -> CommandDescriptor {
        CommandDescriptor {
            name,
            aliases,
            handler: noop,
            usage: name,
            doc: "",
        }
    }

    fn sample_table() -> CommandTable {
        let mut table = CommandTable::new();
        table.register(descriptor("step", &["s"]));
        table.register(descriptor("set", &[]));
        table.register(descriptor("show", &[]));
        table.register(descriptor("continue", &["c"]));
        table
    }

    #[test]
    fn unique_prefix_dispatches() {
        let table = sample_table();
        assert_eq!(table.resolve("cont").unwrap().name, "continue");
        assert_eq!(table.resolve("ste").unwrap().name, "step");
        assert_eq!(table.resolve("sh").unwrap().name, "show");
        assert_eq!(table.resolve("set").unwrap().name, "set");
    }

    #[test]
    fn aliases_win_over_prefixes() {
        let table = sample_table();
        assert_eq!(table.resolve("s").unwrap().name, "step");
        assert_eq!(table.resolve("c").unwrap().name, "continue");
    }

    #[test]
    fn ambiguous_prefix_is_an_error() {
        let mut table = sample_table();
        table.register(descriptor("stop", &[]));
        assert_eq!(
            table.resolve("st").map(|d| d.name),
            Err(DebugError::AmbiguousCommand {
                input: "st".into(),
                candidates: vec!["step".into(), "stop".into()],
            })
        );
        assert_eq!(table.resolve("sto").unwrap().name, "stop");
    }

    #[test]
    fn unknown_command_is_an_error() {
        let table = sample_table();
        assert_eq!(
            table.resolve("frobnicate").map(|d| d.name),
            Err(DebugError::UnknownCommand("frobnicate".into()))
        );
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_alias_panics() {
        let mut table = sample_table();
        table.register(descriptor("source", &["s"]));
    }

    #[test]
    fn standard_table_has_no_collisions() {
        let table = CommandTable::standard();
        for name in [
            "break", "continue", "delete", "expand", "help", "info", "next", "quit", "set",
            "step", "where",
        ] {
            assert_eq!(table.resolve(name).unwrap().name, name);
        }
    }

    #[test]
    fn split_word_and_count() {
        assert_eq!(split_word("  continue  all run "), ("continue", "all run "));
        assert_eq!(split_word("quit"), ("quit", ""));
        assert_eq!(parse_count(""), Ok(1));
        assert_eq!(parse_count("3"), Ok(3));
        assert!(parse_count("0").is_err());
        assert!(parse_count("two").is_err());
    }
}
