//! Remote batch-put capability and per-record outcome classification
//!
//! The remote endpoint is modeled as a narrow trait so a deterministic,
//! network-free substitute can stand in for it in tests. The submitter maps
//! one chunk onto one batch-put call and classifies the structured response.

use std::future::Future;

use tracing::{debug, warn};

use crate::error::SinkError;

/// A record as submitted on the wire, one per payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRecord {
    /// Opaque payload bytes
    pub data: Vec<u8>,
}

/// Per-record outcome reported by the endpoint, in submission order.
///
/// A non-empty `error_code` marks the record as failed; the code and message
/// are retained for diagnostics only and never affect retry eligibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordResult {
    /// Error code for a rejected record, empty or absent on success
    pub error_code: Option<String>,
    /// Human-readable rejection reason, if any
    pub error_message: Option<String>,
}

impl RecordResult {
    /// A successful per-record result
    pub fn ok() -> Self {
        Self::default()
    }

    /// A failed per-record result with diagnostics
    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: Some(code.into()),
            error_message: Some(message.into()),
        }
    }

    /// Whether this position carries a non-empty error indicator
    pub fn is_failure(&self) -> bool {
        self.error_code.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Capability that performs one remote batch-put call.
///
/// Implementations wrap the authenticated client/session (constructed
/// elsewhere) and must be safe for concurrent use; the sink itself issues
/// calls strictly sequentially within one `write_batch` invocation.
///
/// A call-level `Err` means the whole call failed with no per-record detail.
/// An `Ok` response must report one `RecordResult` per submitted record, in
/// the same order.
pub trait BatchIngest: Send + Sync {
    fn put_record_batch(
        &self,
        stream_name: &str,
        records: Vec<WireRecord>,
    ) -> impl Future<Output = Result<Vec<RecordResult>, SinkError>> + Send;
}

/// Outcome of submitting one chunk.
pub(crate) enum AttemptResult {
    /// The call itself failed; nothing was committed.
    Transport(SinkError),
    /// Per-position partition of the submitted chunk.
    PerRecord {
        attempted: usize,
        /// Ascending positions of rejected records within the chunk
        failed: Vec<usize>,
    },
}

/// Maps a chunk to the remote batch-put capability and classifies the
/// response. One submitter serves all attempts of one `write_batch` call.
pub(crate) struct ChunkSubmitter<'a, C> {
    client: &'a C,
    stream_name: &'a str,
}

impl<'a, C: BatchIngest> ChunkSubmitter<'a, C> {
    pub(crate) fn new(client: &'a C, stream_name: &'a str) -> Self {
        Self {
            client,
            stream_name,
        }
    }

    /// Submit one chunk and classify the per-record outcomes.
    pub(crate) async fn submit(&self, chunk: Vec<Vec<u8>>) -> AttemptResult {
        let attempted = chunk.len();
        let records: Vec<WireRecord> = chunk.into_iter().map(|data| WireRecord { data }).collect();

        debug!(
            stream = self.stream_name,
            records = attempted,
            "submitting record batch"
        );

        let responses = match self.client.put_record_batch(self.stream_name, records).await {
            Ok(responses) => responses,
            Err(e) => {
                warn!(stream = self.stream_name, error = %e, "batch-put call failed");
                return AttemptResult::Transport(e);
            }
        };

        if responses.len() != attempted {
            warn!(
                stream = self.stream_name,
                expected = attempted,
                got = responses.len(),
                "batch-put response length mismatch"
            );
            return AttemptResult::Transport(SinkError::Transport(format!(
                "batch-put returned {} results for {} records",
                responses.len(),
                attempted
            )));
        }

        let failed: Vec<usize> = responses
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_failure())
            .map(|(i, _)| i)
            .collect();

        if let Some(&first) = failed.first() {
            let diag = &responses[first];
            warn!(
                stream = self.stream_name,
                failed = failed.len(),
                attempted,
                error_code = diag.error_code.as_deref().unwrap_or(""),
                error_message = diag.error_message.as_deref().unwrap_or(""),
                "records rejected by endpoint"
            );
        }

        AttemptResult::PerRecord { attempted, failed }
    }
}
