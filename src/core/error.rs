//! Error types for the pipeline stages.

use std::sync::Arc;
use std::time::Duration;

/// The main error type for the pipeline.
///
/// Per-item parse failures are not represented here: they travel as values on
/// the error channel. This type covers failures that end a stage.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A source failed to generate an item
    #[error("Source error: {0}")]
    Source(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// A sink failed to accept an outcome
    #[error("Sink error: {0}")]
    Sink(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// The pipeline was cancelled before the collector finished
    #[error("Pipeline was shut down")]
    Shutdown,

    /// A channel was closed unexpectedly
    #[error("Channel was closed unexpectedly")]
    ChannelClosed,

    /// The collector waited too long for the next outcome
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Both outcome channels closed before the expected count was reached
    #[error("Outcome channels closed after {observed} of {expected} expected outcomes")]
    Starved { expected: usize, observed: usize },

    /// The collector stopped while the transformer still had outcomes to deliver
    #[error("Collector stopped after {expected} outcomes but more were produced")]
    Unconsumed { expected: usize },

    /// A stage task panicked or was cancelled by the runtime
    #[error("Task failed: {0}")]
    Task(String),

    /// A custom error with a message
    #[error("{0}")]
    Custom(String),
}

// Convenience constructors
impl Error {
    /// Create a source error from any error type
    pub fn source_error<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Error::Source(Arc::new(error))
    }

    /// Create a sink error from any error type
    pub fn sink_error<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Error::Sink(Arc::new(error))
    }

    /// Create a timeout error
    pub fn timeout(duration_ms: u64) -> Self {
        Error::Timeout { duration_ms }
    }

    /// Create a timeout error for a deadline that elapsed, saturating at
    /// `u64::MAX` milliseconds
    pub fn elapsed(duration: Duration) -> Self {
        Error::timeout(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Error::Custom(message.into())
    }

    /// Whether this error stopped the collector from the outside rather than
    /// from within the pipeline.
    pub fn is_interruption(&self) -> bool {
        matches!(self, Error::Shutdown | Error::Timeout { .. })
    }
}

// Common conversions
impl<T> From<tokio::sync::mpsc::error::SendError<T>> for Error {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Error::ChannelClosed
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Custom(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Custom(s.to_string())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Helper trait for converting foreign errors into our Error type
pub trait IntoError<T> {
    fn into_source_error(self) -> Result<T>;
    fn into_sink_error(self) -> Result<T>;
}

impl<T, E> IntoError<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_source_error(self) -> Result<T> {
        self.map_err(Error::source_error)
    }

    fn into_sink_error(self) -> Result<T> {
        self.map_err(Error::sink_error)
    }
}
