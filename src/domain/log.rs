//! Capture log entity
//!
//! An append-only list of diagnostic lines shown to the user. Each line has
//! a sequence number that keeps increasing across resets, so a presenter
//! can tell which lines it has already rendered.

use std::fmt;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Error,
}

/// A single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    seq: u64,
    level: LogLevel,
    message: String,
}

impl LogLine {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            LogLevel::Info => write!(f, "{}", self.message),
            LogLevel::Error => write!(f, "Error: {}", self.message),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CaptureLog {
    lines: Vec<LogLine>,
    next_seq: u64,
}

impl CaptureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an informational line
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    /// Append an error line (rendered with an `Error: ` prefix)
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into());
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.next_seq += 1;
        self.lines.push(LogLine {
            seq: self.next_seq,
            level,
            message,
        });
    }

    /// Drop all lines. Sequence numbers keep counting.
    pub fn reset(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Lines appended after the given sequence number
    pub fn since(&self, seq: u64) -> impl Iterator<Item = &LogLine> {
        self.lines.iter().filter(move |line| line.seq > seq)
    }

    /// Sequence number of the most recent line ever appended
    pub fn last_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn error_count(&self) -> usize {
        self.lines.iter().filter(|line| line.is_error()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whole log as text, one line per entry
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
