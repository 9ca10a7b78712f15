//! Record routing: level gate, text filter, appenders

use super::{
    appender::Appender, error::Result, filter::TextFilter, log_entry::LogRecord,
    log_level::LogLevel, metrics::LoggerMetrics,
};
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Routes records to appenders
///
/// A record is dropped when its level is below the minimum level or when the
/// text filter rejects its message; otherwise every appender receives it, in
/// registration order. Each appender call is isolated: an error or panic in
/// one appender is reported on stderr and counted, and the others still run.
///
/// `Logger` is `Send + Sync` and is normally shared behind an `Arc` by one or
/// more [`EventLogger`](super::EventLogger)s.
pub struct Logger {
    min_level: RwLock<LogLevel>,
    filter: RwLock<TextFilter>,
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    metrics: LoggerMetrics,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: RwLock::new(LogLevel::Info),
            filter: RwLock::new(TextFilter::default()),
            appenders: RwLock::new(Vec::new()),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_event_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .skip_prefix("Checking if")
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_filter(&self, filter: TextFilter) {
        *self.filter.write() = filter;
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    /// Route one record; returns `true` if it reached the appenders.
    pub fn dispatch(&self, record: LogRecord) -> bool {
        if !self.is_enabled(record.level) {
            return false;
        }

        if !self.filter.read().accepts(&record.message) {
            self.metrics.record_filtered();
            return false;
        }

        let mut appenders = self.appenders.write();
        Self::process_sync(&mut appenders, &record, &self.metrics);
        true
    }

    /// Deliver a record to every appender with per-appender panic isolation
    fn process_sync(
        appenders: &mut [Box<dyn Appender>],
        record: &LogRecord,
        metrics: &LoggerMetrics,
    ) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| appender.append(record))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(panic_info.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_failed();
        } else {
            metrics.record_logged();
        }

        has_error
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    /// Flush every appender, returning the first error after trying them all
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for appender in self.appenders.write().iter_mut() {
            if let Err(e) = appender.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Close every appender
    ///
    /// Debounce appenders stop their timers and forward what they still
    /// buffer. Safe to call more than once; also run on drop.
    pub fn shutdown(&self) -> bool {
        let mut clean = true;
        for appender in self.appenders.write().iter_mut() {
            if let Err(e) = appender.close() {
                eprintln!(
                    "[LOGGER ERROR] Failed to close appender '{}' during shutdown: {}",
                    appender.name(),
                    e
                );
                clean = false;
            }
        }
        clean
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();

        let failed = self.metrics.failed_count();
        if failed > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} failed records (failure rate: {:.2}%)",
                failed,
                self.metrics.failure_rate()
            );
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_event_logger::prelude::*;
/// use std::time::Duration;
///
/// let console = ConsoleAppender::with_colors(false);
/// let debounced = DebounceAppender::new(
///     DebounceConfig::new(16, Duration::from_millis(250), LogLevel::Warn),
///     console,
/// )
/// .unwrap();
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Info)
///     .skip_prefix("heartbeat")
///     .appender(debounced)
///     .build();
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    filter: TextFilter,
    appenders: Vec<Box<dyn Appender>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            filter: TextFilter::default(),
            appenders: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Suppress records whose message starts with `prefix`
    #[must_use = "builder methods return a new value"]
    pub fn skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filter.add_skip(prefix);
        self
    }

    /// Replace the text filter
    #[must_use = "builder methods return a new value"]
    pub fn filter(mut self, filter: TextFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::new();
        logger.set_min_level(self.min_level);
        logger.set_filter(self.filter);
        for appender in self.appenders {
            logger.add_appender(appender);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
