//! Named metric emission helpers.
//!
//! Thin wrappers over the `metrics` macros so metric names live in one
//! place and call sites stay greppable. All of these are no-ops until a
//! recorder is installed (see [`init_metrics`]).
//!
//! [`init_metrics`]: super::init_metrics

use metrics::{counter, gauge, histogram};

/// A task was accepted by `schedule`.
pub fn record_task_scheduled() {
    counter!("tick.tasks.scheduled").increment(1);
}

/// A task's callback ran and returned `Ok`.
pub fn record_task_completed() {
    counter!("tick.tasks.completed").increment(1);
}

/// A task's callback returned an error.
pub fn record_task_failure() {
    counter!("tick.tasks.failed").increment(1);
}

/// Task-queue depth after a mutation.
pub fn record_queue_depth(depth: usize) {
    gauge!("tick.queue.depth").set(depth as f64);
}

/// A drain call reached its fixpoint after running `tasks` tasks.
pub fn record_drain_completed(tasks: u64) {
    histogram!("tick.drain.tasks_per_drain").record(tasks as f64);
}
