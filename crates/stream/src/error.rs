//! Stream error classification
//!
//! Transports classify their own failures: transient errors are retried
//! inside the pull loop and never reach the consumer, everything else tears
//! the reader down. Consumers observe termination only as delivery-channel
//! closure; the detail lands in the logs.

use thiserror::Error;

/// Failure reported by a partition transport.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Clean end of the partition; the reader stops without an error
    #[error("end of stream")]
    EndOfStream,

    /// Retryable I/O failure; the pull loop backs off and tries again
    #[error("transient stream error: {0}")]
    Transient(String),

    /// Non-retryable failure; the reader closes
    #[error("fatal stream error: {0}")]
    Fatal(String),
}

impl TransportError {
    /// Whether the pull loop should retry after a backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Transient(_))
    }
}

/// Failure surfaced by [`StreamReader`](crate::StreamReader) and
/// [`StreamWriter`](crate::StreamWriter) entry points.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The underlying transport failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The writer was closed before the call
    #[error("writer is closed")]
    WriterClosed,
}
