//! Size-accounted value queue for backpressure bookkeeping.

use thiserror::Error;

use super::segmented::SegmentedQueue;

/// Errors surfaced by [`SizedQueue::enqueue`].
#[derive(Debug, Error)]
pub enum SizedQueueError {
    /// The caller-supplied size was not a finite, non-negative number.
    #[error("invalid size {size}: sizes must be finite and non-negative")]
    InvalidSize { size: f64 },
}

/// FIFO of `(value, size)` records with a running size total.
///
/// Sizes are caller-supplied f64 weights (byte counts, chunk counts,
/// whatever the consumer's size function returns). The running total is
/// what stream-style backpressure decisions read, so it is maintained
/// incrementally rather than recomputed.
pub struct SizedQueue<T> {
    records: SegmentedQueue<SizedRecord<T>>,
    total_size: f64,
}

struct SizedRecord<T> {
    value: T,
    size: f64,
}

impl<T> SizedQueue<T> {
    pub fn new() -> Self {
        Self {
            records: SegmentedQueue::new(),
            total_size: 0.0,
        }
    }

    /// As [`SizedQueue::new`] with an explicit segment capacity for the
    /// backing storage.
    pub fn with_segment_capacity(segment_capacity: usize) -> Self {
        Self {
            records: SegmentedQueue::with_segment_capacity(segment_capacity),
            total_size: 0.0,
        }
    }

    /// Append a value with its size.
    ///
    /// Rejects NaN, infinities and negative sizes before anything is
    /// stored; a failed enqueue leaves the queue untouched. Zero is a
    /// valid size.
    pub fn enqueue(&mut self, value: T, size: f64) -> Result<(), SizedQueueError> {
        if !size.is_finite() || size < 0.0 {
            return Err(SizedQueueError::InvalidSize { size });
        }
        self.records.push(SizedRecord { value, size });
        self.total_size += size;
        Ok(())
    }

    /// Remove and return the oldest value, deducting its size from the
    /// running total.
    pub fn dequeue(&mut self) -> Option<T> {
        let record = self.records.shift()?;
        self.total_size -= record.size;
        // Repeated float add/subtract can drift the total a hair below
        // zero once the queue drains; clamp instead of reporting a
        // negative size.
        if self.total_size < 0.0 {
            self.total_size = 0.0;
        }
        Some(record.value)
    }

    /// Oldest value without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.records.peek().map(|record| &record.value)
    }

    /// Drop all queued records and zero the running total.
    pub fn reset(&mut self) {
        debug_assert!(self.records.check_invariants());
        self.records.clear();
        self.total_size = 0.0;
    }

    /// Sum of the sizes of all queued records.
    pub fn total_size(&self) -> f64 {
        self.total_size
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for SizedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
