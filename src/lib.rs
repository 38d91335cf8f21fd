//! Delivery Stream Sink
//!
//! Output connector for stream-processing pipelines that delivers batches of
//! opaque message payloads to a high-throughput, size-limited
//! batch-ingestion endpoint, tolerating partial per-record rejection and
//! transient whole-call failures.
//!
//! # Features
//!
//! - Chunked delivery: arbitrarily large batches split into requests of at
//!   most 500 records
//! - Per-record outcome classification with requeue of only the failed
//!   records, in original order
//! - Retries governed by a per-call backoff policy (jittered exponential by
//!   default, injectable for tests)
//! - Prompt cancellation during backoff waits and in-flight calls
//! - No silent drops: an `Ok(())` return means every payload was confirmed
//!
//! # Example
//!
//! ```no_run
//! use delivery_stream_sink::{BatchWriter, SinkConfiguration};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(client: impl delivery_stream_sink::BatchIngest) -> Result<(), delivery_stream_sink::SinkError> {
//! let config = SinkConfiguration::new("events".to_string())
//!     .with_retry_config(5, 100, 30000);
//! let writer = BatchWriter::new(config, client)?;
//!
//! let cancel = CancellationToken::new();
//! writer
//!     .write_batch(&cancel, vec![br#"{"foo":"bar"}"#.to_vec()])
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod sink;

pub use config::SinkConfiguration;
pub use error::SinkError;
pub use sink::retry::{BackoffCtor, BackoffPolicy, ExponentialBackoff};
pub use sink::submit::{BatchIngest, RecordResult, WireRecord};
pub use sink::{BatchWriter, MAX_CHUNK_SIZE};
