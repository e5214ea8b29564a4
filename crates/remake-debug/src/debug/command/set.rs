//! Session toggles.
//! - set trace LEVELS
//! - set FLAG on|off

use smol_str::SmolStr;

use crate::debug::TraceLevel;
use crate::error::DebugError;
use crate::session::Session;

use super::{
    split_word, CommandContext, CommandDescriptor, CommandResult, CommandStatus, CommandTable,
};

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandDescriptor {
        name: "set",
        aliases: &[],
        handler: cmd_set,
        usage: "set trace LEVELS | set FLAG on|off",
        doc: "Change debugger settings.\n\
              \n\
              set trace LEVELS   trace categories, e.g. basic,jobs or all or none\n\
              set FLAG on|off    FLAG is one of enter-on-error, enter-on-fatal,\n\
              \x20                  enter-on-signal, enter-before-goal, enter-before-read",
    });
}

fn cmd_set(ctx: &mut CommandContext<'_>, args: &str) -> CommandResult {
    let (setting, value) = split_word(args);
    if setting.is_empty() {
        return Err(DebugError::MissingArgument("setting name"));
    }
    if setting == "trace" {
        let level = TraceLevel::parse_names(value)
            .map_err(|err| DebugError::InvalidArgument(SmolStr::new(err.to_string())))?;
        ctx.session.tracer_mut().set_level(level);
        ctx.out.write_line(&format!(
            "Trace level set to {}.",
            level.names().join(",")
        ));
        return Ok(CommandStatus::Ok);
    }
    let Some(flag) = flag_mut(ctx.session, setting) else {
        return Err(DebugError::InvalidArgument(SmolStr::new(setting)));
    };
    *flag = parse_switch(value)?;
    let shown = if *flag { "on" } else { "off" };
    ctx.out.write_line(&format!("{setting} is {shown}."));
    Ok(CommandStatus::Ok)
}

fn flag_mut<'a>(session: &'a mut Session, name: &str) -> Option<&'a mut bool> {
    let flag = match name {
        "enter-on-error" => &mut session.enter_on_error,
        "enter-on-fatal" => &mut session.enter_on_fatal,
        "enter-on-signal" => &mut session.enter_on_signal,
        "enter-before-goal" => &mut session.enter_before_goal,
        "enter-before-read" => &mut session.enter_before_read,
        _ => return None,
    };
    Some(flag)
}

fn parse_switch(value: &str) -> Result<bool, DebugError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        "" => Err(DebugError::MissingArgument("on or off")),
        other => Err(DebugError::InvalidArgument(SmolStr::new(other))),
    }
}
