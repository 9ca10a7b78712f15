//! Core logger types and traits

pub mod appender;
pub mod clock;
pub mod error;
pub mod event_logger;
pub mod filter;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod step;
pub mod template;
pub mod timestamp;

pub use appender::Appender;
pub use clock::{Clock, SteppingClock, SystemClock, Timestamp};
pub use error::{LoggerError, Result};
pub use event_logger::{EventLogger, StepGuard};
pub use filter::TextFilter;
pub use log_context::{FieldValue, LogContext};
pub use log_entry::{Elapsed, ExportedRecord, LogRecord, StepPhase};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::{DebounceMetrics, LoggerMetrics};
pub use step::{StepFrame, StepStack};
pub use template::render;
pub use timestamp::{format_duration, TimestampFormat};
