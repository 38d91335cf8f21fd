//! Ordered buffer of records awaiting confirmed delivery
//!
//! One queue exists per `write_batch` call. Failed records from an attempt
//! are reinserted at the head, ahead of the not-yet-attempted tail, so the
//! original relative order of payloads survives any number of retries.

use std::collections::VecDeque;

/// Ordered in-memory buffer of not-yet-confirmed records for one call.
///
/// Used single-threaded within one call; no internal locking. The queue
/// length is non-increasing across attempts and decreases by exactly the
/// number of records confirmed successful in the most recent attempt.
pub(crate) struct PendingQueue {
    records: VecDeque<Vec<u8>>,
}

impl PendingQueue {
    /// Seed the queue from the input batch, original order preserved.
    pub(crate) fn new(payloads: Vec<Vec<u8>>) -> Self {
        Self {
            records: payloads.into(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Return up to `limit` leading records without mutating the queue.
    ///
    /// The clone is bounded by one chunk; a transport failure leaves the
    /// queue byte-for-byte unchanged.
    pub(crate) fn take_chunk(&self, limit: usize) -> Vec<Vec<u8>> {
        self.records.iter().take(limit).cloned().collect()
    }

    /// Commit the outcome of the chunk just taken.
    ///
    /// Removes the first `attempted` records, then reinserts the ones at the
    /// positions listed in `failed` at the head of the queue, preserving
    /// their relative order ahead of the untouched tail.
    ///
    /// `failed` must hold ascending positions within the attempted chunk.
    pub(crate) fn commit(&mut self, attempted: usize, failed: &[usize]) {
        let mut chunk: Vec<Option<Vec<u8>>> =
            self.records.drain(..attempted).map(Some).collect();
        // push_front in reverse keeps the failed records in their original
        // mutual order
        for &pos in failed.iter().rev() {
            if let Some(record) = chunk.get_mut(pos).and_then(Option::take) {
                self.records.push_front(record);
            }
        }
    }
}
