//! Appender implementations

pub mod channel;
#[cfg(feature = "console")]
pub mod console;
pub mod debounce;
pub mod file;
pub mod filtered;
pub mod json;

pub use channel::ChannelAppender;
#[cfg(feature = "console")]
pub use console::ConsoleAppender;
pub use debounce::{DebounceAppender, DebounceConfig, DebouncePhase};
pub use file::FileAppender;
pub use filtered::FilteredAppender;
pub use json::JsonAppender;

pub use crate::core::Appender;
