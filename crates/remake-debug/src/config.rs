//! Debugger configuration loading.

#![allow(missing_docs)]

use std::path::Path;

use serde::Deserialize;

use crate::debug::TraceLevel;
use crate::error::ConfigError;
use crate::io::Output;
use crate::session::Session;

/// Startup settings for a debugger session.
///
/// Read from the `[debugger]` table of a TOML file; CLI flags are applied
/// on top by the binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    pub enabled: bool,
    pub trace: TraceSetting,
    pub enter_on_error: bool,
    pub enter_on_fatal: bool,
    pub enter_on_signal: bool,
    pub enter_before_goal: bool,
    pub enter_before_read: bool,
    /// Suspend at the Nth event after startup.
    pub step: u32,
    /// Suspend at the Nth top-level event after startup.
    pub next: u32,
}

/// Trace names given either as a list or a comma separated string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TraceSetting {
    List(Vec<String>),
    Text(String),
}

impl Default for TraceSetting {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigToml {
    debugger: Option<DebugConfig>,
}

impl DebugConfig {
    /// Parse a TOML document. A missing `[debugger]` table yields defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: ConfigToml = toml::from_str(text)?;
        let config = raw.debugger.unwrap_or_default();
        config.trace_level()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn trace_level(&self) -> Result<TraceLevel, ConfigError> {
        match &self.trace {
            TraceSetting::Text(text) => TraceLevel::parse_names(text),
            TraceSetting::List(names) => names.iter().try_fold(TraceLevel::empty(), |acc, name| {
                Ok::<_, ConfigError>(acc | TraceLevel::parse_names(name)?)
            }),
        }
    }

    /// Any entry condition requests the debugger even without `enabled`.
    #[must_use]
    pub fn enters_debugger(&self) -> bool {
        self.enter_on_error
            || self.enter_on_fatal
            || self.enter_on_signal
            || self.enter_before_goal
            || self.enter_before_read
    }

    /// Copy flags, trace level, and initial stepping into `session`.
    pub fn apply(&self, session: &mut Session) -> Result<(), ConfigError> {
        session.enabled = self.enabled || self.enters_debugger();
        session.enter_on_error = self.enter_on_error;
        session.enter_on_fatal = self.enter_on_fatal;
        session.enter_on_signal = self.enter_on_signal;
        session.enter_before_goal = self.enter_before_goal;
        session.enter_before_read = self.enter_before_read;
        session.tracer_mut().set_level(self.trace_level()?);
        if self.step > 0 {
            session.arm_step(self.step);
        } else if self.next > 0 {
            session.arm_next(self.next, 0);
        }
        Ok(())
    }

    /// Fresh session configured from these settings.
    pub fn session(&self, out: Output) -> Result<Session, ConfigError> {
        let mut session = Session::new(out);
        self.apply(&mut session)?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_uses_defaults() {
        let config = DebugConfig::from_toml_str("").unwrap();
        assert_eq!(config, DebugConfig::default());
        let config = DebugConfig::from_toml_str("[other]\nkey = 1\n").unwrap();
        assert!(!config.enabled);
    }

    #[test]
    fn parses_flags_and_trace_list() {
        let config = DebugConfig::from_toml_str(
            r#"
[debugger]
enabled = true
trace = ["basic", "jobs"]
enter_on_error = true
step = 2
"#,
        )
        .unwrap();
        assert!(config.enabled);
        assert!(config.enter_on_error);
        assert!(!config.enter_on_fatal);
        assert_eq!(config.step, 2);
        assert_eq!(
            config.trace_level().unwrap(),
            TraceLevel::BASIC | TraceLevel::JOBS
        );
    }

    #[test]
    fn trace_accepts_comma_string() {
        let config =
            DebugConfig::from_toml_str("[debugger]\ntrace = \"basic,verbose\"\n").unwrap();
        assert_eq!(
            config.trace_level().unwrap(),
            TraceLevel::BASIC | TraceLevel::VERBOSE
        );
    }

    #[test]
    fn rejects_unknown_fields_and_trace_names() {
        let err = DebugConfig::from_toml_str("[debugger]\nbogus = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = DebugConfig::from_toml_str("[debugger]\ntrace = \"nope\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTraceLevel(_)));
    }

    #[test]
    fn session_gets_flags_and_stepping() {
        let config = DebugConfig {
            enabled: true,
            enter_on_signal: true,
            next: 3,
            ..DebugConfig::default()
        };
        let session = config.session(Output::sink()).unwrap();
        assert!(session.enabled);
        assert!(session.enter_on_signal);
        assert!(!session.enter_on_error);
        assert_eq!(session.next_count(), 3);
        assert_eq!(session.next_depth(), 0);
        assert_eq!(session.step_count(), 0);
    }

    #[test]
    fn entry_flag_alone_enables_session() {
        let config = DebugConfig::from_toml_str("[debugger]\nenter_before_goal = true\n").unwrap();
        assert!(!config.enabled);
        let session = config.session(Output::sink()).unwrap();
        assert!(session.enabled);
        assert!(session.enter_before_goal);

        let session = DebugConfig::default().session(Output::sink()).unwrap();
        assert!(!session.enabled);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DebugConfig::load("/nonexistent/remake-debug.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/remake-debug.toml"));
    }
}
