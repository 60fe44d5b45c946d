//! Tick Core
//!
//! Deferred-task scheduling and size-accounted queueing for embedder
//! event loops. One segmented circular-buffer FIFO backs both surfaces:
//!
//! - [`TaskScheduler`]: the "run this after the current operation"
//!   mechanism. Callbacks queue up through [`TaskScheduler::schedule`];
//!   [`TaskScheduler::drain`] runs them in FIFO order, isolating failures
//!   and interleaving the host's microtask flush, until no work remains.
//! - [`SizedQueue`]: `(value, size)` records with a running size total
//!   for stream-style backpressure bookkeeping.
//!
//! # Execution model
//!
//! Single-threaded and cooperative. There are no locks or atomics on the
//! hot paths, and reentrancy is supported by construction: a running task
//! may schedule further tasks, and they run in the same drain. Host
//! integration (ambient-context capture, microtask flushing, failure
//! reporting, teardown) goes through the [`HostHooks`] trait.
//!
//! Telemetry is facade-based: the crate emits through `tracing` and
//! `metrics`, and hosts opt in by installing the subscriber and recorder
//! from [`telemetry`].

pub mod config;
pub mod queue;
pub mod scheduler;
pub mod telemetry;

pub use queue::{SegmentedQueue, SizedQueue, SizedQueueError, DEFAULT_SEGMENT_CAPACITY};
pub use scheduler::{HostHooks, SchedulerStats, TaskScheduler};
