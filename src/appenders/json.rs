//! JSON appender for structured logging

use crate::core::{Appender, LogRecord, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON file appender for structured logging
///
/// Writes each record as a single-line JSON object (JSONL format) in the
/// [`ExportedRecord`](crate::core::ExportedRecord) shape:
/// severity, timestamp, elapsed duration, breadcrumb, message, context.
pub struct JsonAppender {
    writer: BufWriter<File>,
}

impl JsonAppender {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Appender for JsonAppender {
    fn name(&self) -> &str {
        "json"
    }

    fn append(&mut self, record: &LogRecord) -> Result<()> {
        let json = serde_json::to_string(&record.to_exported())?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Elapsed, ExportedRecord, LogContext, LogLevel, StepPhase};
    use chrono::{Duration, Utc};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_json_appender_writes_exported_shape() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("steps.jsonl");
        let mut appender = JsonAppender::new(&log_path)?;

        let start = Utc::now();
        let record = LogRecord::new(LogLevel::Info, "0:00:03 [1, 2] load dx.", start)
            .with_context(LogContext::new().with_field("run", "r-17"))
            .with_breadcrumb(vec![1, 2])
            .with_phase(StepPhase::End)
            .with_elapsed(Elapsed::measured(start, Duration::seconds(3)));

        appender.append(&record)?;
        appender.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let parsed: ExportedRecord = serde_json::from_str(content.trim())?;
        assert_eq!(parsed, record.to_exported());
        assert_eq!(parsed.elapsed_duration.as_deref(), Some("0:00:03"));
        Ok(())
    }

    #[test]
    fn test_json_appender_multiple_entries() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("many.jsonl");
        let mut appender = JsonAppender::new(&log_path)?;

        for i in 0..5 {
            appender.append(&LogRecord::new(LogLevel::Debug, format!("Iteration {}", i), Utc::now()))?;
        }
        appender.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);

        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert!(parsed["message"].is_string());
            assert_eq!(parsed["severity"], "DEBUG");
            assert!(parsed["elapsed_duration"].is_null());
        }
        Ok(())
    }
}
