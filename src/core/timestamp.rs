//! Timestamp and duration formatting
//!
//! Appenders choose a [`TimestampFormat`] for the record timestamp. Step
//! durations always use [`format_duration`], which is also the form that
//! appears inside step messages (`0:00:03 [1, 2] lay foundation...`).

use chrono::{DateTime, Duration, Utc};
use std::fmt::Write;
use serde::{Deserialize, Serialize};

/// Timestamp format options for appenders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// Space separated, fraction only when non-zero: `2025-01-08 10:30:45`
    ///
    /// Same form as the start time inside elapsed representations.
    Plain,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_event_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%H:%M:%S".to_string());
    /// ```
    Custom(String),
}

pub(crate) const PLAIN_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Plain => datetime.format(PLAIN_FORMAT).to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                // an invalid strftime pattern surfaces as a fmt::Error here
                let mut out = String::new();
                match write!(out, "{}", datetime.format(format_str)) {
                    Ok(()) => out,
                    Err(_) => datetime.format(PLAIN_FORMAT).to_string(),
                }
            }
        }
    }
}

/// Format a duration as `H:MM:SS`, with `.ffffff` when there are sub-second
/// microseconds.
///
/// Hours are not folded into days; negative durations get a leading `-`.
///
/// ```
/// use chrono::Duration;
/// use rust_event_logger::core::format_duration;
///
/// assert_eq!(format_duration(&Duration::seconds(35)), "0:00:35");
/// assert_eq!(format_duration(&Duration::milliseconds(3_723_500)), "1:02:03.500000");
/// ```
pub fn format_duration(duration: &Duration) -> String {
    let sign = if *duration < Duration::zero() { "-" } else { "" };
    let abs = duration.abs();
    let secs = abs.num_seconds();
    let micros = (abs - Duration::seconds(secs))
        .num_microseconds()
        .unwrap_or(0);

    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if micros == 0 {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}.{micros:06}")
    }
}
