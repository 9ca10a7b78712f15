//! Per-appender text filtering

use crate::core::{Appender, LogRecord, Result, TextFilter};

/// Wraps an appender with its own [`TextFilter`]
///
/// The logger-level filter applies to every appender; this one only to the
/// wrapped appender, e.g. a terse console next to a complete file log.
///
/// # Example
///
/// ```
/// use rust_event_logger::appenders::{FileAppender, FilteredAppender};
/// use rust_event_logger::TextFilter;
///
/// let dir = tempfile::tempdir().unwrap();
/// let file = FileAppender::new(dir.path().join("steps.log")).unwrap();
/// let terse = FilteredAppender::new(file, TextFilter::new(["Checking if"]));
/// ```
pub struct FilteredAppender<A> {
    inner: A,
    filter: TextFilter,
    suppressed: u64,
}

impl<A: Appender> FilteredAppender<A> {
    pub fn new(inner: A, filter: TextFilter) -> Self {
        Self {
            inner,
            filter,
            suppressed: 0,
        }
    }

    /// Number of records the filter kept from the inner appender
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<A: Appender> Appender for FilteredAppender<A> {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        if self.filter.accepts(&record.message) {
            self.inner.append(record)
        } else {
            self.suppressed += 1;
            Ok(())
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::ChannelAppender;
    use crate::core::LogLevel;
    use chrono::Utc;

    #[test]
    fn test_suppresses_matching_records() {
        let (channel, rx) = ChannelAppender::unbounded();
        let mut appender = FilteredAppender::new(channel, TextFilter::new(["noise"]));

        appender
            .append(&LogRecord::new(LogLevel::Error, "noise: retrying", Utc::now()))
            .unwrap();
        appender
            .append(&LogRecord::new(LogLevel::Info, "signal", Utc::now()))
            .unwrap();

        let messages: Vec<String> = rx.try_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["signal"]);
        assert_eq!(appender.suppressed(), 1);
        assert_eq!(appender.name(), "channel");
    }
}
