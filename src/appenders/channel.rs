//! Channel appender: hands records to another thread

use crate::core::{Appender, LogRecord, LoggerError, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

/// Sends a copy of every record over a crossbeam channel
///
/// Useful as the downstream of a debounce appender when another thread owns
/// the real output, and for observing exactly what a pipeline forwards.
pub struct ChannelAppender {
    sender: Sender<LogRecord>,
}

impl ChannelAppender {
    pub fn new(sender: Sender<LogRecord>) -> Self {
        Self { sender }
    }

    pub fn unbounded() -> (Self, Receiver<LogRecord>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender), receiver)
    }

    /// A full channel blocks `append` until the receiver catches up
    pub fn bounded(capacity: usize) -> (Self, Receiver<LogRecord>) {
        let (sender, receiver) = bounded(capacity);
        (Self::new(sender), receiver)
    }
}

impl Appender for ChannelAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        self.sender
            .send(record.clone())
            .map_err(|_| LoggerError::ChannelSendError)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "channel"
    }
}
