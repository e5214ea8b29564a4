//! Operator input and diagnostic output streams.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use owo_colors::OwoColorize;
use tracing::warn;

/// Source of operator command lines.
pub trait LineSource {
    /// Show `prompt` on `out` and read one line; `Ok(None)` signals end of input.
    fn read_line(&mut self, prompt: &str, out: &Output) -> io::Result<Option<String>>;
}

/// Reads commands from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl LineSource for StdinSource {
    fn read_line(&mut self, prompt: &str, out: &Output) -> io::Result<Option<String>> {
        out.prompt(prompt);
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Replays a fixed list of commands, echoing each one after its prompt.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    /// Create a source that yields `lines` in order, then end of input.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, prompt: &str, out: &Output) -> io::Result<Option<String>> {
        let Some(line) = self.lines.pop_front() else {
            return Ok(None);
        };
        out.write_line(&format!("{prompt}{line}"));
        Ok(Some(line))
    }
}

/// Captured output buffer shared with an [`Output`].
#[derive(Debug, Clone, Default)]
pub struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("capture buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Take everything written so far, leaving the buffer empty.
    #[must_use]
    pub fn take(&self) -> String {
        let mut buffer = self.buffer.lock().expect("capture buffer poisoned");
        let text = String::from_utf8_lossy(&buffer).into_owned();
        buffer.clear();
        text
    }
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self.0.lock().expect("capture buffer poisoned");
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Diagnostic stream shared by the tracer, the debugger, and the harness.
///
/// Every write is flushed immediately so debugger output interleaves
/// correctly with recipe output.
#[derive(Clone)]
pub struct Output {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    colored: bool,
    failed: Arc<AtomicBool>,
}

impl Output {
    /// Write to standard output, colored when it is a terminal.
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(io::stdout()))),
            colored: io::stdout().is_terminal(),
            failed: Arc::default(),
        }
    }

    /// Write to an arbitrary sink without color.
    #[must_use]
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
            colored: false,
            failed: Arc::default(),
        }
    }

    /// Write into an in-memory buffer, returned alongside.
    #[must_use]
    pub fn capture() -> (Self, Capture) {
        let capture = Capture::default();
        let output = Self::from_writer(CaptureWriter(capture.buffer.clone()));
        (output, capture)
    }

    /// Discard everything.
    #[must_use]
    pub fn sink() -> Self {
        Self::from_writer(io::sink())
    }

    /// Write a full line.
    pub fn write_line(&self, text: &str) {
        self.write_raw(text, true);
    }

    /// Write a line padded by `indent` spaces.
    pub fn write_indented(&self, indent: u32, text: &str) {
        let width = usize::try_from(indent).unwrap_or(usize::MAX);
        self.write_raw(&format!("{:width$}{text}", ""), true);
    }

    /// Report an operator error, prefixed with `** `.
    pub fn error(&self, message: &str) {
        let line = format!("** {message}");
        if self.colored {
            self.write_raw(&format!("{}", line.red()), true);
        } else {
            self.write_raw(&line, true);
        }
    }

    /// Write a stop banner.
    pub fn banner(&self, text: &str) {
        if self.colored {
            self.write_raw(&format!("{}", text.cyan()), true);
        } else {
            self.write_raw(text, true);
        }
    }

    /// Write a prompt without a trailing newline.
    pub fn prompt(&self, text: &str) {
        self.write_raw(text, false);
    }

    /// Whether any write to the stream has failed.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    fn write_raw(&self, text: &str, newline: bool) {
        let mut sink = self.sink.lock().expect("output stream poisoned");
        let mut result = sink.write_all(text.as_bytes());
        if newline && result.is_ok() {
            result = sink.write_all(b"\n");
        }
        if let Err(err) = result.and_then(|()| sink.flush()) {
            if !self.failed.swap(true, Ordering::Relaxed) {
                warn!(error = %err, "failed to write debugger output");
            }
        }
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("colored", &self.colored)
            .finish_non_exhaustive()
    }
}
