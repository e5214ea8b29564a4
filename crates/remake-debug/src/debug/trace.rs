//! Trace levels and depth-indented diagnostics.

#![allow(missing_docs)]

use bitflags::bitflags;
use smol_str::SmolStr;

use crate::error::ConfigError;
use crate::io::Output;

bitflags! {
    /// Trace categories; an empty set disables tracing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TraceLevel: u32 {
        /// Targets which need to be made and their status.
        const BASIC = 0x001;
        /// A more verbose trace.
        const VERBOSE = 0x002;
        /// Invocation of specific recipe commands.
        const JOBS = 0x004;
        /// Implicit rule searches.
        const IMPLICIT = 0x008;
        const TRACE = 0x010;
        /// Shell invocation details.
        const SHELL = 0x020;
        const MAKEFILES = 0x100;
        /// Reading makefiles.
        const READ_MAKEFILES = 0x200;
        /// Function calls and returns.
        const CALL = 0x400;
        /// Goal target updates.
        const UPDATE_GOAL = 0x800;
        const ALL = 0xfff;
    }
}

const LEVEL_NAMES: &[(&str, TraceLevel)] = &[
    ("basic", TraceLevel::BASIC),
    ("verbose", TraceLevel::VERBOSE),
    ("jobs", TraceLevel::JOBS),
    ("implicit", TraceLevel::IMPLICIT),
    ("trace", TraceLevel::TRACE),
    ("shell", TraceLevel::SHELL),
    ("makefiles", TraceLevel::MAKEFILES),
    ("read-makefiles", TraceLevel::READ_MAKEFILES),
    ("call", TraceLevel::CALL),
    ("update-goal", TraceLevel::UPDATE_GOAL),
];

impl TraceLevel {
    /// Parse a comma or whitespace separated list of category names.
    ///
    /// Also accepts `all`, `none`, and the single-letter forms of `--debug`
    /// (`a`, `b`, `v`, `i`, `j`, `m`, `n`).
    pub fn parse_names(text: &str) -> Result<Self, ConfigError> {
        let mut level = TraceLevel::empty();
        for word in text
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter(|word| !word.is_empty())
        {
            level |= Self::parse_name(word)?;
        }
        Ok(level)
    }

    fn parse_name(word: &str) -> Result<Self, ConfigError> {
        let lowered = word.to_ascii_lowercase();
        let level = match lowered.as_str() {
            "all" | "a" => TraceLevel::ALL,
            "none" | "n" => TraceLevel::empty(),
            "b" => TraceLevel::BASIC,
            "v" => TraceLevel::VERBOSE,
            "i" => TraceLevel::IMPLICIT,
            "j" => TraceLevel::JOBS,
            "m" => TraceLevel::MAKEFILES,
            name => LEVEL_NAMES
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, level)| *level)
                .ok_or_else(|| ConfigError::UnknownTraceLevel(SmolStr::new(word)))?,
        };
        Ok(level)
    }

    /// Category names set in this level.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        if self.is_empty() {
            return vec!["none"];
        }
        if self.contains(TraceLevel::ALL) {
            return vec!["all"];
        }
        LEVEL_NAMES
            .iter()
            .filter(|(_, level)| self.contains(*level))
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Bitmask-gated writer for operator-facing trace output.
#[derive(Debug, Clone)]
pub struct Tracer {
    level: TraceLevel,
    out: Output,
}

impl Tracer {
    #[must_use]
    pub fn new(level: TraceLevel, out: Output) -> Self {
        Self { level, out }
    }

    #[must_use]
    pub fn level(&self) -> TraceLevel {
        self.level
    }

    pub fn set_level(&mut self, level: TraceLevel) {
        self.level = level;
    }

    #[must_use]
    pub fn output(&self) -> &Output {
        &self.out
    }

    /// Whether any bit of `category` is being traced.
    #[inline]
    #[must_use]
    pub fn enabled(&self, category: TraceLevel) -> bool {
        self.level.intersects(category)
    }

    /// Write `message` indented by `indent` spaces if `category` is traced.
    #[inline]
    pub fn emit(&self, category: TraceLevel, message: &str, indent: u32) {
        if self.enabled(category) {
            self.out.write_indented(indent, message);
        }
    }

    /// Like [`Tracer::emit`], building the message only when it will be written.
    #[inline]
    pub fn emit_with(&self, category: TraceLevel, indent: u32, message: impl FnOnce() -> String) {
        if self.enabled(category) {
            self.out.write_indented(indent, &message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names_unions_categories() {
        let level = TraceLevel::parse_names("basic, jobs read-makefiles").unwrap();
        assert_eq!(
            level,
            TraceLevel::BASIC | TraceLevel::JOBS | TraceLevel::READ_MAKEFILES
        );
        assert_eq!(TraceLevel::parse_names("a").unwrap(), TraceLevel::ALL);
        assert_eq!(TraceLevel::parse_names("none").unwrap(), TraceLevel::empty());
        assert_eq!(TraceLevel::parse_names("").unwrap(), TraceLevel::empty());
    }

    #[test]
    fn parse_names_rejects_unknown_category() {
        let err = TraceLevel::parse_names("basic,bogus").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTraceLevel(name) if name == "bogus"));
    }

    #[test]
    fn names_list_set_categories() {
        assert_eq!(TraceLevel::empty().names(), vec!["none"]);
        assert_eq!(TraceLevel::ALL.names(), vec!["all"]);
        assert_eq!(
            (TraceLevel::JOBS | TraceLevel::CALL).names(),
            vec!["jobs", "call"]
        );
    }

    #[test]
    fn emit_is_gated_by_level_and_indented() {
        let (out, capture) = Output::capture();
        let tracer = Tracer::new(TraceLevel::BASIC, out);
        tracer.emit(TraceLevel::JOBS, "hidden", 0);
        tracer.emit(TraceLevel::BASIC, "Considering target file 'all'.", 2);
        tracer.emit_with(TraceLevel::VERBOSE, 0, || unreachable!("not traced"));
        assert_eq!(capture.contents(), "  Considering target file 'all'.\n");
    }
}
