//! Logging macros for ergonomic step and message templates.
//!
//! Arguments are written as `key = value` pairs and collected into a
//! [`LogContext`](crate::LogContext) that fills the `{key}` placeholders of
//! the template.
//!
//! # Examples
//!
//! ```
//! use rust_event_logger::prelude::*;
//! use rust_event_logger::info;
//! use std::sync::Arc;
//!
//! let events = EventLogger::with_system_clock(Arc::new(Logger::new()), LogContext::new());
//!
//! // Plain message
//! info!(events, "Server started");
//!
//! // With template arguments
//! info!(events, "listening on port {port}", port = 8080);
//!
//! // A step ending when the guard drops
//! {
//!     let _load = step!(events, "load {table}", table = "patients");
//! }
//! ```

/// Build a [`LogContext`](crate::LogContext) from `key = value` pairs.
///
/// # Examples
///
/// ```
/// use rust_event_logger::fields;
///
/// let args = fields!(depth = 20, material = "concrete");
/// assert_eq!(args.format_fields(), "depth=20 material=concrete");
/// assert!(fields!().is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::LogContext::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {
        $crate::LogContext::new()
            $(.with_field(stringify!($key), $value))+
    };
}

/// Enter a step with template arguments; evaluates to the
/// [`StepGuard`](crate::StepGuard).
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # use std::sync::Arc;
/// # let events = EventLogger::with_system_clock(Arc::new(Logger::new()), LogContext::new());
/// use rust_event_logger::step;
/// let mut frame = step!(events, "frame {stories} story house", stories = 2);
/// frame.append(" with {rooms} rooms").set_arg("rooms", 6);
/// ```
#[macro_export]
macro_rules! step {
    ($events:expr, $template:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $events.step($template, $crate::fields!($($key = $value),*))
    };
}

/// Log a template at the given level.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # use std::sync::Arc;
/// # let events = EventLogger::with_system_clock(Arc::new(Logger::new()), LogContext::new());
/// use rust_event_logger::log;
/// log!(events, LogLevel::Info, "Simple message");
/// log!(events, LogLevel::Error, "Error code: {code}", code = 500);
/// ```
#[macro_export]
macro_rules! log {
    ($events:expr, $level:expr, $template:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $events.log($level, $template, &$crate::fields!($($key = $value),*))
    };
}

/// Log a trace-level template.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # use std::sync::Arc;
/// # let logger = Arc::new(Logger::new());
/// # logger.set_min_level(LogLevel::Trace);
/// # let events = EventLogger::with_system_clock(logger, LogContext::new());
/// use rust_event_logger::trace;
/// trace!(events, "Entering function: calculate()");
/// trace!(events, "Variable value: {value}", value = 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($events:expr, $($arg:tt)+) => {
        $crate::log!($events, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level template.
#[macro_export]
macro_rules! debug {
    ($events:expr, $($arg:tt)+) => {
        $crate::log!($events, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level template.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # use std::sync::Arc;
/// # let events = EventLogger::with_system_clock(Arc::new(Logger::new()), LogContext::new());
/// use rust_event_logger::info;
/// info!(events, "Application started");
/// info!(events, "Processing {count} items", count = 100);
/// ```
#[macro_export]
macro_rules! info {
    ($events:expr, $($arg:tt)+) => {
        $crate::log!($events, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level template.
#[macro_export]
macro_rules! warn {
    ($events:expr, $($arg:tt)+) => {
        $crate::log!($events, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level template.
///
/// # Examples
///
/// ```
/// # use rust_event_logger::prelude::*;
/// # use std::sync::Arc;
/// # let events = EventLogger::with_system_clock(Arc::new(Logger::new()), LogContext::new());
/// use rust_event_logger::error;
/// error!(events, "Failed to connect to {host}", host = "db-01");
/// ```
#[macro_export]
macro_rules! error {
    ($events:expr, $($arg:tt)+) => {
        $crate::log!($events, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level template.
#[macro_export]
macro_rules! fatal {
    ($events:expr, $($arg:tt)+) => {
        $crate::log!($events, $crate::LogLevel::Fatal, $($arg)+)
    };
}
