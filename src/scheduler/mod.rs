//! Deferred-task scheduling.
//!
//! The "run this after the current operation" mechanism: hosts queue
//! callbacks through [`TaskScheduler::schedule`], then call
//! [`TaskScheduler::drain`] at the end of each event-loop turn to run
//! everything in FIFO order, interleaved with the host's own microtask
//! queue. Host integration points live on the [`HostHooks`] trait.

mod drain;
mod hooks;
mod task;

pub use drain::{SchedulerStats, TaskScheduler};
pub use hooks::HostHooks;
