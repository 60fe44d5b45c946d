//! Segmented FIFO storage.
//!
//! [`SegmentedQueue`] is the core structure: an unbounded FIFO over a
//! chain of fixed-capacity ring buffers, so growth never copies existing
//! items and drained segments hand their memory back promptly.
//! [`SizedQueue`] layers per-item size accounting on top of it for
//! stream-style backpressure bookkeeping.

mod segment;
mod segmented;
mod sized;

pub use segmented::{SegmentedQueue, DEFAULT_SEGMENT_CAPACITY};
pub use sized::{SizedQueue, SizedQueueError};
