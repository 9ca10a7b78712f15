//! Console appender implementation

use crate::core::{Appender, LogRecord, Result, TimestampFormat};
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: TimestampFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_event_logger::appenders::ConsoleAppender;
    /// use rust_event_logger::TimestampFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_timestamp_format(TimestampFormat::Plain);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn format_text(&self, record: &LogRecord) -> String {
        if !self.use_colors {
            return record.render_line(&self.timestamp_format);
        }

        let level_str = format!("{:5}", record.level)
            .color(record.level.color_code())
            .to_string();
        format!(
            "[{}] [{}] {}",
            self.timestamp_format.format(&record.timestamp),
            level_str,
            record.render_body()
        )
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        let output = self.format_text(record);

        // Route Error and Fatal levels to stderr, others to stdout
        if record.level.is_failure() {
            eprintln!("{}", output);
        } else {
            println!("{}", output);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, StepPhase};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_plain_format_without_colors() {
        let appender =
            ConsoleAppender::with_colors(false).with_timestamp_format(TimestampFormat::Plain);
        let record = LogRecord::new(
            LogLevel::Warn,
            "0:00:05 [1, 3] frame 2 story house.",
            Utc.with_ymd_and_hms(2000, 1, 1, 12, 30, 15).unwrap(),
        )
        .with_phase(StepPhase::End);

        assert_eq!(
            appender.format_text(&record),
            "[2000-01-01 12:30:15] [WARN ] end 0:00:05 [1, 3] frame 2 story house."
        );
    }

    #[test]
    fn test_colored_format_keeps_message() {
        let appender = ConsoleAppender::new();
        let record = LogRecord::new(LogLevel::Error, "load failed", Utc::now());
        assert!(appender.format_text(&record).ends_with("load failed"));
    }
}
