//! Debouncing appender
//!
//! Buffers bursts of records and forwards them to a downstream appender once
//! logging has been quiet for an interval, or immediately when a severe
//! record arrives.
//!
//! All buffer and timer state sits behind one mutex and moves through a small
//! state machine:
//!
//! ```text
//!            submit (below flush level)
//!   Idle ─────────────────────────────────▶ Pending{deadline}
//!    ▲  ◀── submit (at/above flush level:       │
//!    │      flush on the caller's thread)       │ deadline passes
//!    │                                          ▼
//!    └──────────────────────────────────── Flushing (timer thread)
//!
//!   any state ── stop ──▶ Stopped (after a final flush)
//! ```
//!
//! Every submit re-evaluates the timer under that mutex, so a cancellation
//! can never be lost to a timer that is about to fire: the timer thread only
//! flushes if it still observes its own deadline as due.

use crate::core::logger::panic_message;
use crate::core::{Appender, DebounceMetrics, LogLevel, LogRecord, LoggerError, Result};
use parking_lot::{Condvar, Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const DEFAULT_CAPACITY: usize = 2;
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(500);

/// Construction-time settings of a [`DebounceAppender`]
///
/// # Example
///
/// ```
/// use rust_event_logger::appenders::DebounceConfig;
/// use rust_event_logger::LogLevel;
///
/// let config = DebounceConfig::from_json(
///     r#"{ "capacity": 64, "quiet_interval_ms": 250, "flush_level": "WARN" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.capacity, 64);
/// assert_eq!(config.flush_level, LogLevel::Warn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebounceConfig {
    /// Maximum buffered records; the oldest is evicted to admit a new one
    pub capacity: usize,

    /// Quiet time after the last record before a flush
    #[serde(rename = "quiet_interval_ms", with = "duration_millis")]
    pub quiet_interval: Duration,

    /// Records at or above this level flush immediately
    pub flush_level: LogLevel,
}

impl DebounceConfig {
    pub fn new(capacity: usize, quiet_interval: Duration, flush_level: LogLevel) -> Self {
        Self {
            capacity,
            quiet_interval,
            flush_level,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LoggerError::config(
                "DebounceAppender",
                "capacity must be greater than zero",
            ));
        }
        if self.quiet_interval.is_zero() {
            return Err(LoggerError::config(
                "DebounceAppender",
                "quiet interval must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_QUIET_INTERVAL, LogLevel::Warn)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Observable timer state of a [`DebounceAppender`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePhase {
    /// Nothing scheduled
    Idle,
    /// A quiet-interval flush is scheduled
    Pending,
    /// The timer thread is forwarding the buffer
    Flushing,
    /// Stopped; new records are rejected
    Stopped,
}

#[derive(Debug, Clone, Copy)]
enum TimerState {
    Idle,
    Pending { deadline: Instant },
    Flushing,
    Stopped,
}

impl TimerState {
    fn phase(&self) -> DebouncePhase {
        match self {
            TimerState::Idle => DebouncePhase::Idle,
            TimerState::Pending { .. } => DebouncePhase::Pending,
            TimerState::Flushing => DebouncePhase::Flushing,
            TimerState::Stopped => DebouncePhase::Stopped,
        }
    }
}

struct DebounceState {
    buffer: VecDeque<LogRecord>,
    timer: TimerState,
}

struct Shared {
    name: String,
    state: Mutex<DebounceState>,
    wake: Condvar,
    // Lock order: downstream, then state.
    downstream: Mutex<Box<dyn Appender>>,
    metrics: DebounceMetrics,
}

impl Shared {
    /// Forward buffered records until the buffer is observed empty.
    ///
    /// Holding the downstream lock for the whole drain keeps concurrent
    /// flushes from interleaving, so records leave in buffer order.
    fn flush(&self) -> usize {
        let mut downstream = self.downstream.lock();
        let mut drained = 0;
        let mut forwarded = 0;

        loop {
            let next = self.state.lock().buffer.pop_front();
            let Some(record) = next else { break };
            drained += 1;

            match catch_unwind(AssertUnwindSafe(|| downstream.append(&record))) {
                Ok(Ok(())) => {
                    forwarded += 1;
                    self.metrics.record_forwarded();
                }
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender '{}' could not forward to '{}': {}",
                        self.name,
                        downstream.name(),
                        e
                    );
                    self.metrics.record_failed();
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Downstream of '{}' panicked: {}. \
                         Record dropped, appender continues to function.",
                        self.name,
                        panic_message(panic_info.as_ref())
                    );
                    self.metrics.record_failed();
                }
            }
        }

        if drained > 0 {
            self.metrics.record_flush();
            match catch_unwind(AssertUnwindSafe(|| downstream.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => eprintln!(
                    "[LOGGER ERROR] Downstream of '{}' flush failed: {}",
                    self.name, e
                ),
                Err(panic_info) => eprintln!(
                    "[LOGGER CRITICAL] Downstream of '{}' panicked during flush: {}",
                    self.name,
                    panic_message(panic_info.as_ref())
                ),
            }
        }

        forwarded
    }
}

fn run_timer(shared: Arc<Shared>) {
    let mut state = shared.state.lock();
    loop {
        match state.timer {
            TimerState::Stopped => break,
            TimerState::Pending { deadline } => {
                if Instant::now() >= deadline {
                    state.timer = TimerState::Flushing;
                    MutexGuard::unlocked(&mut state, || {
                        shared.flush();
                    });
                    // a submit during the flush may have scheduled a new deadline
                    if matches!(state.timer, TimerState::Flushing) {
                        state.timer = TimerState::Idle;
                    }
                } else {
                    shared.wake.wait_until(&mut state, deadline);
                }
            }
            TimerState::Idle | TimerState::Flushing => shared.wake.wait(&mut state),
        }
    }
}

/// Appender that coalesces bursts of records
///
/// Records are buffered (at most `capacity`, oldest evicted first) and
/// forwarded in order to the downstream appender when no record has arrived
/// for `quiet_interval`. A record at or above `flush_level` cancels the
/// pending timer and flushes the buffer on the submitting thread.
///
/// Submitting never waits on the downstream appender except for that
/// immediate flush. Downstream errors and panics are reported on stderr and
/// counted; they never reach the submitter.
///
/// [`stop`](Self::stop) (also run on drop and by [`Appender::close`]) ends the
/// timer thread and forwards whatever is still buffered. Records submitted
/// after `stop` are rejected with [`LoggerError::AppenderStopped`].
///
/// # Example
///
/// ```
/// use rust_event_logger::appenders::{ChannelAppender, DebounceAppender, DebounceConfig};
/// use rust_event_logger::{LogLevel, LogRecord};
/// use std::time::Duration;
///
/// let (downstream, rx) = ChannelAppender::unbounded();
/// let debounce = DebounceAppender::new(
///     DebounceConfig::new(8, Duration::from_millis(50), LogLevel::Warn),
///     downstream,
/// )
/// .unwrap();
///
/// debounce.submit(LogRecord::new(LogLevel::Info, "buffered", chrono::Utc::now())).unwrap();
/// debounce.submit(LogRecord::new(LogLevel::Error, "urgent", chrono::Utc::now())).unwrap();
///
/// // the error flushed both records synchronously
/// assert_eq!(rx.try_iter().count(), 2);
/// debounce.stop();
/// ```
pub struct DebounceAppender {
    config: DebounceConfig,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DebounceAppender {
    pub fn new<A: Appender + 'static>(config: DebounceConfig, downstream: A) -> Result<Self> {
        config.validate()?;

        let shared = Arc::new(Shared {
            name: "debounce".to_string(),
            state: Mutex::new(DebounceState {
                buffer: VecDeque::with_capacity(config.capacity),
                timer: TimerState::Idle,
            }),
            wake: Condvar::new(),
            downstream: Mutex::new(Box::new(downstream)),
            metrics: DebounceMetrics::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("debounce-timer".to_string())
            .spawn(move || run_timer(worker_shared))
            .map_err(|e| {
                LoggerError::io_operation(
                    "spawning debounce timer thread",
                    "quiet-interval flushes unavailable",
                    e,
                )
            })?;

        Ok(Self {
            config,
            shared,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Debounce with the default settings (capacity 2, 500 ms, flush at `Warn`)
    pub fn with_defaults<A: Appender + 'static>(downstream: A) -> Result<Self> {
        Self::new(DebounceConfig::default(), downstream)
    }

    pub fn submit(&self, record: LogRecord) -> Result<()> {
        let severe = record.level >= self.config.flush_level;
        {
            let mut state = self.shared.state.lock();
            if matches!(state.timer, TimerState::Stopped) {
                self.shared.metrics.record_rejected();
                return Err(LoggerError::appender_stopped(&self.shared.name));
            }
            self.shared.metrics.record_submitted();

            if matches!(state.timer, TimerState::Pending { .. }) {
                state.timer = TimerState::Idle;
            }

            while state.buffer.len() >= self.config.capacity {
                state.buffer.pop_front();
                self.shared.metrics.record_evicted();
            }
            state.buffer.push_back(record);

            if !severe {
                state.timer = TimerState::Pending {
                    deadline: Instant::now() + self.config.quiet_interval,
                };
                self.shared.wake.notify_one();
            }
        }

        if severe {
            self.shared.metrics.record_immediate_flush();
            self.shared.flush();
        }
        Ok(())
    }

    /// Forward everything buffered now; returns the number of records delivered
    pub fn flush_now(&self) -> usize {
        self.shared.flush()
    }

    /// Stop the timer and forward what is still buffered
    ///
    /// Idempotent: later calls find the buffer empty and forward nothing.
    pub fn stop(&self) -> usize {
        self.shared.state.lock().timer = TimerState::Stopped;
        self.shared.wake.notify_all();

        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                eprintln!(
                    "[LOGGER ERROR] Timer thread of '{}' panicked before stop",
                    self.shared.name
                );
            }
        }

        self.shared.flush()
    }

    pub fn phase(&self) -> DebouncePhase {
        self.shared.state.lock().timer.phase()
    }

    pub fn buffered_len(&self) -> usize {
        self.shared.state.lock().buffer.len()
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    pub fn metrics(&self) -> &DebounceMetrics {
        &self.shared.metrics
    }
}

impl Appender for DebounceAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        self.submit(record.clone())
    }

    fn flush(&mut self) -> Result<()> {
        self.shared.flush();
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.stop();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.shared.name
    }
}

impl Drop for DebounceAppender {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for DebounceAppender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceAppender")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .field("buffered", &self.buffered_len())
            .finish()
    }
}
