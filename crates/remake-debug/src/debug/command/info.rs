//! Inspection commands.
//! - help: list commands or show one command's documentation
//! - info: breakpoints, session flags, trace level
//! - where: target stack
//! - expand: variable expansion in the current scope

use smol_str::SmolStr;

use crate::debug::resolve::is_abbrev_of;
use crate::error::DebugError;

use super::breakpoints::list_breakpoints;
use super::{
    split_word, CommandContext, CommandDescriptor, CommandResult, CommandStatus, CommandTable,
};

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandDescriptor {
        name: "help",
        aliases: &["h", "?"],
        handler: cmd_help,
        usage: "help [COMMAND]",
        doc: "List debugger commands, or describe COMMAND.",
    });
    table.register(CommandDescriptor {
        name: "info",
        aliases: &["i"],
        handler: cmd_info,
        usage: "info [breakpoints|flags|trace]",
        doc: "Show breakpoints, debugger flags and counters, or the trace level.\n\
              Without an argument, show all three.",
    });
    table.register(CommandDescriptor {
        name: "where",
        aliases: &["bt", "backtrace"],
        handler: cmd_where,
        usage: "where",
        doc: "Show the stack of targets being updated, innermost first.",
    });
    table.register(CommandDescriptor {
        name: "expand",
        aliases: &["x"],
        handler: cmd_expand,
        usage: "expand TEXT",
        doc: "Expand variable references in TEXT as seen by the current target.",
    });
}

fn cmd_help(ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    let (word, _) = split_word(args);
    if word.is_empty() {
        ctx.out.write_line("Available commands:");
        for descriptor in ctx.table.iter() {
            ctx.out.write_line(&format!("  {}", descriptor.usage));
        }
        ctx.out
            .write_line("Type \"help COMMAND\" for more information on a command.");
        return Ok(CommandStatus::Ok);
    }
    let descriptor = ctx.table.resolve(word)?;
    ctx.out.write_line(descriptor.usage);
    ctx.out.write_line("");
    ctx.out.write_line(descriptor.doc);
    if !descriptor.aliases.is_empty() {
        ctx.out.write_line("");
        ctx.out
            .write_line(&format!("Aliases: {}", descriptor.aliases.join(", ")));
    }
    Ok(CommandStatus::Ok)
}

fn cmd_info(ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    let (word, _) = split_word(args);
    if word.is_empty() {
        list_breakpoints(ctx.breakpoints, ctx.out);
        show_flags(ctx);
        show_trace(ctx);
    } else if is_abbrev_of(word, "breakpoints", 1) {
        list_breakpoints(ctx.breakpoints, ctx.out);
    } else if is_abbrev_of(word, "flags", 1) {
        show_flags(ctx);
    } else if is_abbrev_of(word, "trace", 1) {
        show_trace(ctx);
    } else {
        return Err(DebugError::InvalidArgument(SmolStr::new(word)));
    }
    Ok(CommandStatus::Ok)
}

fn show_flags(ctx: &CommandContext<'_>) {
    let session = &*ctx.session;
    let flags = [
        ("enabled", session.enabled),
        ("enter-on-error", session.enter_on_error),
        ("enter-on-fatal", session.enter_on_fatal),
        ("enter-on-signal", session.enter_on_signal),
        ("enter-before-goal", session.enter_before_goal),
        ("enter-before-read", session.enter_before_read),
    ];
    for (name, value) in flags {
        let value = if value { "on" } else { "off" };
        ctx.out.write_line(&format!("{name:<18} {value}"));
    }
    ctx.out
        .write_line(&format!("{:<18} {}", "step-count", session.step_count()));
    ctx.out.write_line(&format!(
        "{:<18} {} (depth {})",
        "next-count",
        session.next_count(),
        session.next_depth()
    ));
}

fn show_trace(ctx: &CommandContext<'_>) {
    let level = ctx.session.tracer().level();
    ctx.out.write_line(&format!(
        "Trace level: {} (0x{:03x})",
        level.names().join(","),
        level.bits()
    ));
}

fn cmd_where(ctx: &mut CommandContext<'_>, _args: &str) -> CommandResult {
    let stack = ctx.engine.target_stack();
    if stack.is_empty() {
        ctx.out.write_line("No targets are being updated.");
        return Ok(CommandStatus::Ok);
    }
    for (index, target) in stack.iter().rev().enumerate() {
        let name = ctx
            .engine
            .target_name(*target)
            .unwrap_or_else(|| SmolStr::new("?"));
        ctx.out.write_line(&format!("#{index}  {name}"));
    }
    Ok(CommandStatus::Ok)
}

fn cmd_expand(ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    let text = args.trim();
    if text.is_empty() {
        return Err(DebugError::MissingArgument("text to expand"));
    }
    let scope = ctx.engine.current_scope();
    let expanded = ctx.engine.expand_variables(text, scope);
    ctx.out.write_line(&expanded);
    Ok(CommandStatus::Ok)
}
