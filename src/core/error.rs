//! Error types for the event logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Completion percentage that cannot be extrapolated from
    #[error("Cannot estimate completion from {percent}% progress")]
    InvalidProgress { percent: f64 },

    /// Elapsed time or ETA requested with no step in progress
    #[error("No active step to measure from")]
    NoActiveStep,

    /// Record submitted to an appender after it was stopped
    #[error("Appender '{name}' already stopped")]
    AppenderStopped { name: String },

    /// Channel send error
    #[error("Failed to hand log record to receiving thread")]
    ChannelSendError,

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn invalid_progress(percent: f64) -> Self {
        LoggerError::InvalidProgress { percent }
    }

    pub fn appender_stopped(name: impl Into<String>) -> Self {
        LoggerError::AppenderStopped { name: name.into() }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("DebounceAppender", "capacity must be greater than zero");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::invalid_progress(0.0);
        assert!(matches!(err, LoggerError::InvalidProgress { .. }));

        let err = LoggerError::appender_stopped("debounce");
        assert!(matches!(err, LoggerError::AppenderStopped { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_progress(0.0);
        assert_eq!(err.to_string(), "Cannot estimate completion from 0% progress");

        let err = LoggerError::config("DebounceAppender", "quiet interval must be non-zero");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for DebounceAppender: quiet interval must be non-zero"
        );

        assert_eq!(LoggerError::NoActiveStep.to_string(), "No active step to measure from");
        assert_eq!(
            LoggerError::appender_stopped("debounce").to_string(),
            "Appender 'debounce' already stopped"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "thread limit reached");
        let err = LoggerError::io_operation("spawning timer thread", "cannot start", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("spawning timer thread"));
        assert!(err.to_string().contains("cannot start"));
    }
}
