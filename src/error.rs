//! Error types for the delivery stream sink
//!
//! This module defines all error types used throughout the sink,
//! providing clear, actionable error messages for developers.

use thiserror::Error;

/// Error type for sink operations
///
/// All errors are descriptive and actionable, providing sufficient
/// information for developers to diagnose and resolve issues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// Invalid configuration error
    ///
    /// Occurs when configuration values are invalid or missing required fields.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Whole-call transport/service failure
    ///
    /// Occurs when a batch-put call itself fails before any per-record
    /// result is available. The unsent queue is left untouched and the
    /// attempt is retried with backoff. Once the retry budget is exhausted
    /// this error is surfaced verbatim.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Records still rejected after the retry budget was exhausted
    ///
    /// Carries the number of records that were still failing in the most
    /// recent attempt.
    #[error("{count} records failed to be delivered after retries were exhausted")]
    RecordsRejected {
        /// Records failing in the most recent attempt
        count: usize,
    },

    /// The call's cancellation signal fired
    ///
    /// Propagated immediately from a backoff wait or an in-flight call,
    /// never wrapped in the other error kinds.
    #[error("Delivery cancelled")]
    Cancelled,
}

impl SinkError {
    /// Check if the error came from the call's cancellation signal
    ///
    /// Cancellation is terminal for the calling task; transport and
    /// rejection errors indicate the batch must be redelivered.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SinkError::Cancelled)
    }
}
