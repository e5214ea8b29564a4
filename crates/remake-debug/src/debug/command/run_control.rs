//! Resume and terminate commands.
//! - continue: resume, optionally to a temporary target breakpoint
//! - step/next: resume with stepping armed
//! - quit: leave the build with the quit sentinel

use tracing::debug;

use crate::debug::{parse_event_options, resolve_target, Scope, TraceLevel, VariableOrigin};
use crate::error::DebugError;

use super::{
    parse_count, split_word, CommandContext, CommandDescriptor, CommandResult, CommandStatus,
    CommandTable,
};

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandDescriptor {
        name: "continue",
        aliases: &["c"],
        handler: cmd_continue,
        usage: "continue [TARGET [all|run|prereq|end]*]",
        doc: "Continue executing the build until another breakpoint or stopping\n\
              point. If a target is given and valid, a temporary breakpoint is set\n\
              at that target before continuing.\n\
              \n\
              When a target name is given, breakpoint event types can follow it.\n\
              Without a target, tracing is turned off.\n\
              \n\
              See also \"break\" and \"step\".",
    });
    table.register(CommandDescriptor {
        name: "step",
        aliases: &["s"],
        handler: cmd_step,
        usage: "step [COUNT]",
        doc: "Resume and stop again at the COUNT-th next build event (default 1),\n\
              including events of prerequisites evaluated recursively.",
    });
    table.register(CommandDescriptor {
        name: "next",
        aliases: &["n"],
        handler: cmd_next,
        usage: "next [COUNT]",
        doc: "Resume and stop again at the COUNT-th next build event (default 1)\n\
              that is not nested deeper than the current target.",
    });
    table.register(CommandDescriptor {
        name: "quit",
        aliases: &["q", "exit"],
        handler: cmd_quit,
        usage: "quit",
        doc: "Stop the build and exit with the debugger quit status.",
    });
}

fn cmd_continue(ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    let (word, rest) = split_word(args);
    if word.is_empty() {
        ctx.session.tracer_mut().set_level(TraceLevel::empty());
    } else {
        let target = resolve_target(&*ctx.engine, word)?;
        let options = parse_event_options(rest.split_whitespace(), false)?;
        let name = ctx
            .engine
            .target_name(target)
            .unwrap_or_else(|| word.into());
        ctx.breakpoints.add(target, name, options.mask, true)?;
    }

    ctx.session.reset_stepping();
    ctx.engine
        .define_variable("MAKEFLAGS", "", VariableOrigin::Debugger, Scope::Global);
    Ok(CommandStatus::ResumeContinue)
}

fn cmd_step(ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    let count = parse_count(args)?;
    ctx.session.arm_step(count);
    debug!(count, "step armed");
    Ok(CommandStatus::ResumeStep)
}

fn cmd_next(ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    let count = parse_count(args)?;
    let depth = ctx.stop.depth;
    ctx.session.arm_next(count, depth);
    debug!(count, depth, "next armed");
    Ok(CommandStatus::ResumeNext)
}

fn cmd_quit(_ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    if !args.trim().is_empty() {
        return Err(DebugError::InvalidArgument(args.trim().into()));
    }
    Ok(CommandStatus::Quit)
}
