//! Breakpoint commands.
//! - break: install a breakpoint, or list them
//! - delete: clear breakpoint events for a target, or all breakpoints

use crate::debug::{parse_event_options, resolve_target, Breakpoints};
use crate::error::DebugError;
use crate::io::Output;

use super::{
    split_word, CommandContext, CommandDescriptor, CommandResult, CommandStatus, CommandTable,
};

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandDescriptor {
        name: "break",
        aliases: &["b"],
        handler: cmd_break,
        usage: "break [TARGET [all|run|prereq|end|before|temp]*]",
        doc: "Set a breakpoint on TARGET. Event types select when it stops:\n\
              'before' before prerequisites are checked, 'prereq' after they\n\
              are checked, 'run' or 'end' after the recipe ran, 'all' (the\n\
              default) at every event. 'temp' makes the breakpoint one-shot.\n\
              \n\
              Without arguments, list breakpoints.",
    });
    table.register(CommandDescriptor {
        name: "delete",
        aliases: &["d"],
        handler: cmd_delete,
        usage: "delete [TARGET [all|run|prereq|end|before]*]",
        doc: "Remove breakpoint events from TARGET (all events by default).\n\
              Without arguments, delete every breakpoint.",
    });
}

fn cmd_break(ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    let (word, rest) = split_word(args);
    if word.is_empty() {
        list_breakpoints(ctx.breakpoints, ctx.out);
        return Ok(CommandStatus::Ok);
    }
    let target = resolve_target(&*ctx.engine, word)?;
    let options = parse_event_options(rest.split_whitespace(), true)?;
    let name = ctx
        .engine
        .target_name(target)
        .unwrap_or_else(|| word.into());
    ctx.breakpoints
        .add(target, name.clone(), options.mask, options.temporary)?;
    let kind = if options.temporary {
        "Temporary breakpoint"
    } else {
        "Breakpoint"
    };
    ctx.out.write_line(&format!(
        "{kind} on target '{name}' ({}) set.",
        options.mask.describe()
    ));
    Ok(CommandStatus::Ok)
}

fn cmd_delete(ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    let (word, rest) = split_word(args);
    if word.is_empty() {
        let count = ctx.breakpoints.len();
        ctx.breakpoints.clear_all();
        ctx.out.write_line(&format!("Deleted {count} breakpoint(s)."));
        return Ok(CommandStatus::Ok);
    }
    let target = resolve_target(&*ctx.engine, word)?;
    let options = parse_event_options(rest.split_whitespace(), false)?;
    if !ctx.breakpoints.clear(target, options.mask) {
        return Err(DebugError::NoBreakpoint(word.into()));
    }
    ctx.out.write_line(&format!(
        "Breakpoint events ({}) on target '{word}' deleted.",
        options.mask.describe()
    ));
    let remaining = ctx.breakpoints.effective_mask(target);
    if !remaining.is_empty() {
        ctx.out.write_line(&format!(
            "Target '{word}' still stops at: {}.",
            remaining.describe()
        ));
    }
    Ok(CommandStatus::Ok)
}

pub(super) fn list_breakpoints(breakpoints: &Breakpoints, out: &Output) {
    if breakpoints.is_empty() {
        out.write_line("No breakpoints.");
        return;
    }
    out.write_line("Num Type      Events        Target");
    for (index, breakpoint) in breakpoints.iter().enumerate() {
        let kind = if breakpoint.temporary { "temporary" } else { "permanent" };
        out.write_line(&format!(
            "{:<3} {kind:<9} {:<13} {}",
            index + 1,
            breakpoint.mask.describe(),
            breakpoint.name
        ));
    }
}
