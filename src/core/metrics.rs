//! Counters for observing the logging pipeline
//!
//! [`LoggerMetrics`] covers routing (records delivered, filtered out, or
//! failed in an appender). [`DebounceMetrics`] covers one debounce appender's
//! buffer: evictions, flushes and records forwarded downstream.

use std::sync::atomic::{AtomicU64, Ordering};

/// Routing statistics for a [`Logger`](super::Logger)
///
/// # Example
///
/// ```
/// use rust_event_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.filtered_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records every appender accepted
    total_logged: AtomicU64,

    /// Records rejected by the text filter
    filtered_count: AtomicU64,

    /// Records at least one appender failed (error or panic) to accept
    failed_count: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Failure rate as a percentage (0.0 - 100.0) of routed records
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_count() as f64;
        let total = self.total_logged() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            filtered_count: AtomicU64::new(self.filtered_count()),
            failed_count: AtomicU64::new(self.failed_count()),
        }
    }
}

/// Buffer statistics for a [`DebounceAppender`](crate::appenders::DebounceAppender)
#[derive(Debug)]
pub struct DebounceMetrics {
    submitted: AtomicU64,
    evicted: AtomicU64,
    forwarded: AtomicU64,
    failed: AtomicU64,
    /// Flushes that drained at least one record
    flushes: AtomicU64,
    /// Flushes triggered by a record at or above the flush level
    immediate_flushes: AtomicU64,
    rejected_after_stop: AtomicU64,
}

impl DebounceMetrics {
    pub const fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            forwarded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            immediate_flushes: AtomicU64::new(0),
            rejected_after_stop: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn immediate_flushes(&self) -> u64 {
        self.immediate_flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_after_stop(&self) -> u64 {
        self.rejected_after_stop.load(Ordering::Relaxed)
    }

    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_evicted(&self) {
        self.evicted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_immediate_flush(&self) {
        self.immediate_flushes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected_after_stop.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for DebounceMetrics {
    fn default() -> Self {
        Self::new()
    }
}
