//! Chunked batch delivery to a size-limited batch-ingestion endpoint
//!
//! This module provides the core BatchWriter that splits an arbitrarily
//! large batch into bounded-size requests, classifies per-record outcomes,
//! requeues only the failed records in original order, and governs retries
//! with a backoff policy that can abort the whole call once exhausted.

pub mod pending;
pub mod retry;
pub mod submit;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::SinkConfiguration;
use crate::error::SinkError;
use crate::sink::pending::PendingQueue;
use crate::sink::retry::{BackoffCtor, ExponentialBackoff, RetryController};
use crate::sink::submit::{AttemptResult, BatchIngest, ChunkSubmitter};

/// Maximum records per batch-put call, the documented endpoint limit.
pub const MAX_CHUNK_SIZE: usize = 500;

/// Writer delivering batches of opaque payloads to a delivery stream.
///
/// Each `write_batch` call runs as one logical unit of sequential work and
/// owns its pending queue and retry state; multiple calls for different
/// batches may run concurrently over the same client handle.
///
/// # Example
///
/// ```no_run
/// use delivery_stream_sink::{BatchWriter, SinkConfiguration};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(client: impl delivery_stream_sink::BatchIngest) -> Result<(), delivery_stream_sink::SinkError> {
/// let config = SinkConfiguration::new("events".to_string());
/// let writer = BatchWriter::new(config, client)?;
/// let cancel = CancellationToken::new();
/// writer.write_batch(&cancel, vec![b"payload".to_vec()]).await?;
/// # Ok(())
/// # }
/// ```
pub struct BatchWriter<C> {
    /// Configuration (immutable)
    config: Arc<SinkConfiguration>,
    /// Remote batch-put capability (thread-safe, constructed elsewhere)
    client: C,
    /// Per-call backoff policy constructor
    backoff_ctor: BackoffCtor,
}

impl<C: BatchIngest> BatchWriter<C> {
    /// Create a new writer with the provided configuration and client
    ///
    /// The default backoff policy is a jittered exponential backoff built
    /// from the configuration's retry settings.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Configuration` if validation fails.
    pub fn new(config: SinkConfiguration, client: C) -> Result<Self, SinkError> {
        config.validate()?;

        let backoff_config = config.clone();
        let backoff_ctor: BackoffCtor =
            Arc::new(move || Box::new(ExponentialBackoff::from_config(&backoff_config)));

        Ok(Self {
            config: Arc::new(config),
            client,
            backoff_ctor,
        })
    }

    /// Replace the backoff policy constructor
    ///
    /// Lets callers bound or make deterministic the retry behavior; a fresh
    /// policy is still instantiated per `write_batch` call.
    pub fn with_backoff_ctor(mut self, ctor: BackoffCtor) -> Self {
        self.backoff_ctor = ctor;
        self
    }

    /// Deliver one batch of ordered opaque payloads.
    ///
    /// Splits the batch into chunks of at most [`MAX_CHUNK_SIZE`] records,
    /// submits them strictly sequentially, requeues rejected records at the
    /// head of the pending queue in their original relative order, and
    /// retries imperfect attempts under the backoff policy. An empty batch
    /// returns `Ok(())` with no remote calls.
    ///
    /// `Ok(())` implies every payload was confirmed by the endpoint; no
    /// payload is ever dropped without a non-`Ok` return.
    ///
    /// # Errors
    ///
    /// - [`SinkError::Transport`] (or whatever call-level error the client
    ///   returned) verbatim, once the retry budget is exhausted by
    ///   whole-call failures.
    /// - [`SinkError::RecordsRejected`] naming the still-failing record
    ///   count, once the budget is exhausted by per-record rejections.
    /// - [`SinkError::Cancelled`] promptly when `cancel` fires during a
    ///   backoff wait or while a call is in flight.
    pub async fn write_batch(
        &self,
        cancel: &CancellationToken,
        payloads: Vec<Vec<u8>>,
    ) -> Result<(), SinkError> {
        let total = payloads.len();
        let mut pending = PendingQueue::new(payloads);
        let mut retry = RetryController::new(&self.backoff_ctor);
        let submitter = ChunkSubmitter::new(&self.client, &self.config.stream_name);

        while !pending.is_empty() {
            let chunk = pending.take_chunk(MAX_CHUNK_SIZE);

            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(SinkError::Cancelled),
                result = submitter.submit(chunk) => result,
            };

            match result {
                AttemptResult::Transport(err) => {
                    // nothing was committed; the queue is unchanged
                    match retry.on_failure() {
                        Some(delay) => self.wait(cancel, delay).await?,
                        None => {
                            warn!(
                                stream = %self.config.stream_name,
                                outstanding = pending.len(),
                                "retry budget exhausted on transport failure"
                            );
                            return Err(err);
                        }
                    }
                }
                AttemptResult::PerRecord { attempted, failed } => {
                    pending.commit(attempted, &failed);
                    if failed.is_empty() {
                        // clean attempt, no backoff consultation
                        continue;
                    }
                    match retry.on_failure() {
                        Some(delay) => self.wait(cancel, delay).await?,
                        None => {
                            warn!(
                                stream = %self.config.stream_name,
                                failing = failed.len(),
                                "retry budget exhausted with records still rejected"
                            );
                            return Err(SinkError::RecordsRejected {
                                count: failed.len(),
                            });
                        }
                    }
                }
            }
        }

        debug!(
            stream = %self.config.stream_name,
            records = total,
            "batch delivered"
        );
        Ok(())
    }

    /// Sleep for a backoff delay, returning promptly on cancellation.
    async fn wait(&self, cancel: &CancellationToken, delay: Duration) -> Result<(), SinkError> {
        debug!(
            stream = %self.config.stream_name,
            delay_ms = delay.as_millis() as u64,
            "backing off before retry"
        );
        tokio::select! {
            _ = cancel.cancelled() => Err(SinkError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}
