//! Log record structure

use super::clock::Timestamp;
use super::log_context::LogContext;
use super::log_level::LogLevel;
use super::timestamp::{format_duration, TimestampFormat, PLAIN_FORMAT};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which boundary of a step a record marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPhase {
    Begin,
    End,
}

impl StepPhase {
    pub fn to_str(&self) -> &'static str {
        match self {
            StepPhase::Begin => "begin",
            StepPhase::End => "end",
        }
    }
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Timing attached to a step record
///
/// Begin records carry only the start; end records and
/// [`EventLogger::elapsed`](super::EventLogger::elapsed) also carry the
/// measured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub start: Timestamp,
    pub duration: Option<Duration>,
}

impl Elapsed {
    pub fn started(start: Timestamp) -> Self {
        Self {
            start,
            duration: None,
        }
    }

    pub fn measured(start: Timestamp, duration: Duration) -> Self {
        Self {
            start,
            duration: Some(duration),
        }
    }

    pub fn start_repr(&self) -> String {
        self.start.format(PLAIN_FORMAT).to_string()
    }

    pub fn duration_repr(&self) -> Option<String> {
        self.duration.as_ref().map(format_duration)
    }

    /// Duration in whole microseconds, `None` before the step ends or on overflow
    pub fn micros(&self) -> Option<i64> {
        self.duration.and_then(|d| d.num_microseconds())
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.duration_repr(), self.micros()) {
            (Some(duration), Some(micros)) => {
                write!(f, "({}, {}, {})", self.start_repr(), duration, micros)
            }
            (Some(duration), None) => write!(f, "({}, {}, none)", self.start_repr(), duration),
            _ => write!(f, "({}, none, none)", self.start_repr()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: Timestamp,
    pub context: LogContext,
    pub breadcrumb: Vec<u64>,
    pub phase: Option<StepPhase>,
    pub elapsed: Option<Elapsed>,
    pub extra: LogContext,
}

impl LogRecord {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one record always renders as one line.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl AsRef<str>, timestamp: Timestamp) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message.as_ref()),
            timestamp,
            context: LogContext::new(),
            breadcrumb: Vec::new(),
            phase: None,
            elapsed: None,
            extra: LogContext::new(),
        }
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_breadcrumb(mut self, breadcrumb: Vec<u64>) -> Self {
        self.breadcrumb = breadcrumb;
        self
    }

    pub fn with_phase(mut self, phase: StepPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_elapsed(mut self, elapsed: Elapsed) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    pub fn with_extra(mut self, extra: LogContext) -> Self {
        self.extra = extra;
        self
    }

    /// Single-line text form shared by the console and file appenders
    pub fn render_line(&self, timestamp_format: &TimestampFormat) -> String {
        format!(
            "[{}] [{:5}] {}",
            timestamp_format.format(&self.timestamp),
            self.level,
            self.render_body()
        )
    }

    /// Phase, message and context, without timestamp or level
    pub fn render_body(&self) -> String {
        let mut body = String::with_capacity(self.message.len() + 16);
        if let Some(phase) = self.phase {
            body.push_str(phase.to_str());
            body.push(' ');
        }
        body.push_str(&self.message);

        if !self.context.is_empty() {
            body.push_str(" | ");
            body.push_str(&self.context.format_fields());
        }
        body
    }

    pub fn to_exported(&self) -> ExportedRecord {
        ExportedRecord {
            severity: self.level,
            timestamp: self.timestamp,
            elapsed_duration: self.elapsed.and_then(|e| e.duration_repr()),
            elapsed_micros: self.elapsed.and_then(|e| e.micros()),
            breadcrumb: self.breadcrumb.clone(),
            message: self.message.clone(),
            context: self.context.clone(),
            phase: self.phase,
            extra: self.extra.clone(),
        }
    }
}

/// Serialization shape of a record for machine-readable sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRecord {
    pub severity: LogLevel,
    pub timestamp: Timestamp,
    pub elapsed_duration: Option<String>,
    pub elapsed_micros: Option<i64>,
    pub breadcrumb: Vec<u64>,
    pub message: String,
    pub context: LogContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<StepPhase>,
    #[serde(default, skip_serializing_if = "LogContext::is_empty")]
    pub extra: LogContext,
}
