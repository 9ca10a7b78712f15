//! # Rust Event Logger
//!
//! Nested step instrumentation for long-running batch work, with a
//! debouncing sink for noisy progress output.
//!
//! ## Features
//!
//! - **Nested steps**: begin/end records with breadcrumbs, durations and ETA
//! - **Templated messages**: `{name}` placeholders filled from step arguments
//! - **Debounced delivery**: bursts are coalesced, severe records flush at once
//! - **Multiple Appenders**: Console, file, JSON, channel and filtered appenders
//! - **Testable time**: every timestamp comes from an injectable [`Clock`]
//!
//! ## Example
//!
//! ```
//! use rust_event_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let (channel, rx) = ChannelAppender::unbounded();
//! let logger = Arc::new(Logger::builder().appender(channel).build());
//! let events = EventLogger::new(logger, fields!(run = "demo"), Arc::new(SteppingClock::default()));
//!
//! {
//!     let _build = step!(events, "Build {kind}", kind = "house");
//!     info!(events, "{n} walls up", n = 4);
//! }
//!
//! let messages: Vec<String> = rx.try_iter().map(|r| r.message).collect();
//! assert_eq!(messages[0], "0:00:00 [1] Build house...");
//! assert_eq!(messages[1], "4 walls up");
//! assert_eq!(messages[2], "0:00:05 [1] Build house.");
//! ```

#[macro_use]
pub mod macros;

pub mod appenders;
pub mod core;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    pub use crate::appenders::{
        ChannelAppender, DebounceAppender, DebounceConfig, DebouncePhase, FileAppender,
        FilteredAppender, JsonAppender,
    };
    pub use crate::core::{
        Appender, Clock, Elapsed, EventLogger, FieldValue, LogContext, LogLevel, LogRecord,
        Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, StepGuard, StepPhase,
        SteppingClock, SystemClock, TextFilter, Timestamp, TimestampFormat,
    };
    pub use crate::{fields, info, step};
}

#[cfg(feature = "console")]
pub use crate::appenders::ConsoleAppender;
pub use crate::appenders::{
    ChannelAppender, DebounceAppender, DebounceConfig, DebouncePhase, FileAppender,
    FilteredAppender, JsonAppender,
};
pub use crate::core::{
    format_duration, render, Appender, Clock, DebounceMetrics, Elapsed, EventLogger,
    ExportedRecord, FieldValue, LogContext, LogLevel, LogRecord, Logger, LoggerBuilder,
    LoggerError, LoggerMetrics, Result, StepFrame, StepGuard, StepPhase, StepStack,
    SteppingClock, SystemClock, TextFilter, Timestamp, TimestampFormat,
};
