//! Configuration types for the delivery stream sink
//!
//! This module defines the configuration structures and validation logic.

use crate::error::SinkError;
use serde::{Deserialize, Serialize};

/// Complete configuration for initializing the sink
///
/// Represents all configuration needed to initialize a BatchWriter instance:
/// the target delivery stream and the retry/backoff settings from which the
/// default backoff policy is built. The authenticated client handle itself is
/// constructed elsewhere and passed in alongside this configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfiguration {
    /// Target delivery stream name (required)
    pub stream_name: String,
    /// Maximum retry waits granted per write_batch call (default: 5)
    ///
    /// A budget of K allows K+1 batch-put calls for the same failing state
    /// before the call aborts.
    pub retry_max_retries: u32,
    /// Base delay in milliseconds for exponential backoff (default: 100)
    pub retry_base_delay_ms: u64,
    /// Maximum delay in milliseconds for exponential backoff (default: 30000)
    pub retry_max_delay_ms: u64,
    /// Enable full jitter in backoff calculation (default: true)
    pub retry_jitter: bool,
}

impl SinkConfiguration {
    /// Create a new configuration with defaults
    ///
    /// # Arguments
    ///
    /// * `stream_name` - Target delivery stream name
    ///
    /// # Example
    ///
    /// ```
    /// use delivery_stream_sink::SinkConfiguration;
    ///
    /// let config = SinkConfiguration::new("events".to_string());
    /// assert_eq!(config.retry_max_retries, 5);
    /// ```
    pub fn new(stream_name: String) -> Self {
        Self {
            stream_name,
            retry_max_retries: 5,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 30000,
            retry_jitter: true,
        }
    }

    /// Set retry configuration
    ///
    /// # Arguments
    ///
    /// * `max_retries` - Maximum retry waits per call
    /// * `base_delay_ms` - Base delay in milliseconds for exponential backoff
    /// * `max_delay_ms` - Maximum delay in milliseconds
    pub fn with_retry_config(
        mut self,
        max_retries: u32,
        base_delay_ms: u64,
        max_delay_ms: u64,
    ) -> Self {
        self.retry_max_retries = max_retries;
        self.retry_base_delay_ms = base_delay_ms;
        self.retry_max_delay_ms = max_delay_ms;
        self
    }

    /// Enable or disable backoff jitter
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.retry_jitter = jitter;
        self
    }

    /// Validate configuration
    ///
    /// Checks that all required fields are present and valid.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if configuration is valid, or `Err(SinkError)` if invalid.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if:
    /// - `stream_name` is empty or whitespace only
    /// - `retry_base_delay_ms` is 0
    /// - `retry_max_delay_ms` is smaller than `retry_base_delay_ms`
    pub fn validate(&self) -> Result<(), SinkError> {
        if self.stream_name.trim().is_empty() {
            return Err(SinkError::Configuration(
                "stream_name cannot be empty".to_string(),
            ));
        }

        if self.retry_base_delay_ms == 0 {
            return Err(SinkError::Configuration(
                "retry_base_delay_ms must be > 0".to_string(),
            ));
        }

        if self.retry_max_delay_ms < self.retry_base_delay_ms {
            return Err(SinkError::Configuration(format!(
                "retry_max_delay_ms ({}) must be >= retry_base_delay_ms ({})",
                self.retry_max_delay_ms, self.retry_base_delay_ms
            )));
        }

        Ok(())
    }
}
