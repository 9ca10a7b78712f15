//! Time sources for step timing
//!
//! Every timestamp an [`EventLogger`](super::EventLogger) records comes from
//! an injected [`Clock`]. Production code opts into [`SystemClock`]; tests use
//! [`SteppingClock`], whose readings are distinct and predictable.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Point in time used throughout the crate
pub type Timestamp = DateTime<Utc>;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Deterministic clock for tests
///
/// Each call to [`Clock::now`] advances the clock by one second more than the
/// previous call did: the first reading is `start + 1s`, the second
/// `start + 3s`, the third `start + 6s`, and so on.
///
/// # Example
///
/// ```
/// use rust_event_logger::core::{Clock, SteppingClock};
///
/// let clock = SteppingClock::default();
/// let first = clock.now();
/// let second = clock.now();
/// assert_eq!((second - first).num_seconds(), 2);
/// ```
#[derive(Debug)]
pub struct SteppingClock {
    state: Mutex<SteppingState>,
}

#[derive(Debug)]
struct SteppingState {
    now: Timestamp,
    step_secs: i64,
}

/// 2000-01-01T12:30:00Z
const DEFAULT_START_SECS: i64 = 946_729_800;

impl SteppingClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            state: Mutex::new(SteppingState {
                now: start,
                step_secs: 1,
            }),
        }
    }

    /// Current reading without advancing
    pub fn peek(&self) -> Timestamp {
        self.state.lock().now
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        let start = Timestamp::from_timestamp(DEFAULT_START_SECS, 0)
            .expect("constant start timestamp is in range");
        Self::new(start)
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Timestamp {
        let mut state = self.state.lock();
        let step = Duration::seconds(state.step_secs);
        state.now += step;
        state.step_secs += 1;
        state.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stepping_clock_default_start() {
        let clock = SteppingClock::default();
        let expected = Utc.with_ymd_and_hms(2000, 1, 1, 12, 30, 0).unwrap();
        assert_eq!(clock.peek(), expected);
    }

    #[test]
    fn test_stepping_clock_increments_grow() {
        let start = Utc.with_ymd_and_hms(2000, 1, 1, 12, 30, 0).unwrap();
        let clock = SteppingClock::new(start);

        let readings: Vec<i64> = (0..4).map(|_| (clock.now() - start).num_seconds()).collect();
        assert_eq!(readings, vec![1, 3, 6, 10]);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let clock = SteppingClock::default();
        let before = clock.peek();
        assert_eq!(clock.peek(), before);
        assert!(clock.now() > before);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
