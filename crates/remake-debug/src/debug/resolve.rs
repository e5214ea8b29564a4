//! Target name resolution and breakpoint option parsing.

#![allow(missing_docs)]

use smol_str::SmolStr;

use crate::error::DebugError;

use super::{BreakpointMask, BuildEngine, TargetId};

/// Event mask and kind parsed from a breakpoint option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOptions {
    pub mask: BreakpointMask,
    pub temporary: bool,
}

/// Resolve `word` to a target in the engine's current scope.
///
/// Variable references are expanded first; an empty expansion is treated
/// as unresolved.
pub fn resolve_target(engine: &dyn BuildEngine, word: &str) -> Result<TargetId, DebugError> {
    let expanded = engine.expand_variables(word, engine.current_scope());
    let name = expanded.trim();
    if name.is_empty() {
        return Err(DebugError::UnknownTarget(SmolStr::new(word)));
    }
    engine
        .lookup_target(name)
        .ok_or_else(|| DebugError::UnknownTarget(SmolStr::new(word)))
}

/// Parse breakpoint event modifiers, unioning every token.
///
/// No event tokens means every event. `temp` is accepted only when
/// `allow_temp` is set.
pub fn parse_event_options<'a, I>(tokens: I, allow_temp: bool) -> Result<EventOptions, DebugError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut mask = BreakpointMask::empty();
    let mut temporary = false;
    for token in tokens {
        if allow_temp && is_abbrev_of(token, "temporary", 1) {
            temporary = true;
            continue;
        }
        mask |= event_option(token)?;
    }
    if mask.is_empty() {
        mask = BreakpointMask::ALL;
    }
    Ok(EventOptions { mask, temporary })
}

fn event_option(token: &str) -> Result<BreakpointMask, DebugError> {
    if is_abbrev_of(token, "all", 1) {
        Ok(BreakpointMask::ALL)
    } else if is_abbrev_of(token, "prerequisites", 3) {
        Ok(BreakpointMask::AFTER_PREREQ)
    } else if is_abbrev_of(token, "before", 1) {
        Ok(BreakpointMask::BEFORE_PREREQ)
    } else if is_abbrev_of(token, "run", 1) || is_abbrev_of(token, "end", 1) {
        Ok(BreakpointMask::AFTER_CMD)
    } else {
        Err(DebugError::InvalidBreakpointOption(SmolStr::new(token)))
    }
}

/// Whether `input` is `word` or a prefix of it at least `min` characters long.
pub(crate) fn is_abbrev_of(input: &str, word: &str, min: usize) -> bool {
    input.len() >= min && word.starts_with(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_tokens_means_all_events() {
        let options = parse_event_options([], false).unwrap();
        assert_eq!(options.mask, BreakpointMask::ALL);
        assert!(!options.temporary);
    }

    #[test]
    fn tokens_are_unioned() {
        let options = parse_event_options(["before", "run"], false).unwrap();
        assert_eq!(
            options.mask,
            BreakpointMask::BEFORE_PREREQ | BreakpointMask::AFTER_CMD
        );
        let options = parse_event_options(["prereq", "end"], false).unwrap();
        assert_eq!(
            options.mask,
            BreakpointMask::AFTER_PREREQ | BreakpointMask::AFTER_CMD
        );
    }

    #[test]
    fn prerequisite_accepts_abbreviations() {
        for token in ["pre", "prereq", "prerequisites"] {
            let options = parse_event_options([token], false).unwrap();
            assert_eq!(options.mask, BreakpointMask::AFTER_PREREQ, "{token}");
        }
        assert!(parse_event_options(["pr"], false).is_err());
    }

    #[test]
    fn temp_only_for_break() {
        let options = parse_event_options(["temp"], true).unwrap();
        assert!(options.temporary);
        assert_eq!(options.mask, BreakpointMask::ALL);
        assert_eq!(
            parse_event_options(["temp"], false),
            Err(DebugError::InvalidBreakpointOption("temp".into()))
        );
    }

    #[test]
    fn unknown_token_is_an_error() {
        assert_eq!(
            parse_event_options(["run", "bogus"], false),
            Err(DebugError::InvalidBreakpointOption("bogus".into()))
        );
    }
}
