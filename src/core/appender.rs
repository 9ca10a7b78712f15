//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogRecord};

pub trait Appender: Send + Sync {
    fn append(&mut self, record: &LogRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Release resources at shutdown; buffered records must be written first.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str;
}

impl<A: Appender + ?Sized> Appender for Box<A> {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        (**self).append(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
