//! Deferred-task scheduler and its reentrant drain loop.
//!
//! [`schedule`] appends callbacks to a segmented FIFO; [`drain`] runs them
//! in order, isolating failures and interleaving the host's microtask
//! flush until no work remains. All queue mutation goes through `RefCell`
//! borrows that are never held across a hook or callback invocation, which
//! is what makes same-thread reentrancy (a running task scheduling another
//! task) safe.
//!
//! [`schedule`]: TaskScheduler::schedule
//! [`drain`]: TaskScheduler::drain

use std::cell::{Cell, RefCell};

use serde::Serialize;

use crate::queue::{SegmentedQueue, DEFAULT_SEGMENT_CAPACITY};
use crate::telemetry;

use super::hooks::HostHooks;
use super::task::Task;

/// Deferred-task scheduler over a segmented FIFO.
///
/// Single-threaded: the scheduler is `!Sync` and expects to be driven
/// from one thread, typically right after each turn of the host's event
/// loop. Constructing one fully initializes its queue; there is no global
/// instance and no lazy setup to race against.
pub struct TaskScheduler<H: HostHooks> {
    hooks: H,
    queue: RefCell<SegmentedQueue<Task<H>>>,
    stats: DrainCounters,
}

/// Internal counters. `Cell` suffices because the scheduler never leaves
/// its thread.
#[derive(Default)]
struct DrainCounters {
    scheduled: Cell<u64>,
    executed: Cell<u64>,
    failed: Cell<u64>,
    drain_passes: Cell<u64>,
    microtask_flushes: Cell<u64>,
}

/// Point-in-time copy of the scheduler's counters, for host export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    /// Tasks accepted by `schedule` (drops during shutdown not included).
    pub scheduled: u64,
    /// Tasks whose callback ran, successfully or not.
    pub executed: u64,
    /// Subset of `executed` whose callback returned an error.
    pub failed: u64,
    /// Inner drain passes completed.
    pub drain_passes: u64,
    /// Times the host's microtask flush was invoked.
    pub microtask_flushes: u64,
}

impl<H: HostHooks> TaskScheduler<H> {
    /// Create a scheduler with the default segment capacity.
    pub fn new(hooks: H) -> Self {
        Self::with_segment_capacity(hooks, DEFAULT_SEGMENT_CAPACITY)
    }

    /// Create a scheduler whose queue uses `segment_capacity` slots per
    /// segment (see [`SegmentedQueue::with_segment_capacity`]).
    pub fn with_segment_capacity(hooks: H, segment_capacity: usize) -> Self {
        Self {
            hooks,
            queue: RefCell::new(SegmentedQueue::with_segment_capacity(segment_capacity)),
            stats: DrainCounters::default(),
        }
    }

    /// The host hooks this scheduler was built with.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Queue a callback with no arguments to run on the next drain.
    pub fn schedule<F>(&self, callback: F)
    where
        F: FnOnce(&[H::Value]) -> Result<(), H::Error> + 'static,
    {
        self.schedule_with_args(callback, Vec::new());
    }

    /// Queue a callback with an argument list to run on the next drain.
    ///
    /// The current ambient context is captured here, and the task will
    /// observe it (not the context current at drain time) when it runs.
    /// FIFO order is strict: tasks run in exactly the order they were
    /// accepted. During host teardown ([`HostHooks::is_shutting_down`])
    /// this is a silent no-op.
    pub fn schedule_with_args<F>(&self, callback: F, args: Vec<H::Value>)
    where
        F: FnOnce(&[H::Value]) -> Result<(), H::Error> + 'static,
    {
        if self.hooks.is_shutting_down() {
            return;
        }
        let task = Task {
            callback: Box::new(callback),
            args: args.into_boxed_slice(),
            context: self.hooks.capture_context(),
        };
        let was_empty;
        let depth;
        {
            let mut queue = self.queue.borrow_mut();
            was_empty = queue.is_empty();
            queue.push(task);
            depth = queue.len();
        }
        self.stats.scheduled.set(self.stats.scheduled.get() + 1);
        telemetry::record_task_scheduled();
        telemetry::record_queue_depth(depth);
        if was_empty {
            self.hooks.notify_pending();
        }
    }

    /// Run queued tasks until none remain, in strict FIFO order.
    ///
    /// Tasks scheduled while draining (by a running task or by the
    /// microtask flush) still run before this returns. After each batch
    /// of tasks the host's microtask flush runs; the loop exits only when
    /// a flush leaves the queue empty, so the flush runs at least once
    /// even if the queue was empty on entry.
    ///
    /// A failing task is reported through [`HostHooks::report_uncaught`]
    /// and never prevents the tasks behind it from running. A task that
    /// always schedules a successor keeps `drain` from returning; bounding
    /// that is the host's job, as it is for any run-to-completion loop.
    pub fn drain(&self) {
        let mut tasks_run: u64 = 0;
        let mut passes: u64 = 0;
        loop {
            loop {
                // The borrow must end before the task runs: the task body
                // may reenter `schedule`.
                let task = self.queue.borrow_mut().shift();
                let Some(task) = task else { break };
                self.run_task(task);
                tasks_run += 1;
            }
            passes += 1;
            self.stats.drain_passes.set(self.stats.drain_passes.get() + 1);
            self.hooks.drain_microtasks();
            self.stats
                .microtask_flushes
                .set(self.stats.microtask_flushes.get() + 1);
            if self.queue.borrow().is_empty() {
                break;
            }
        }
        telemetry::record_drain_completed(tasks_run);
        telemetry::record_queue_depth(0);
        tracing::trace!(tasks = tasks_run, passes, "drain reached fixpoint");
    }

    fn run_task(&self, task: Task<H>) {
        let Task {
            callback,
            args,
            context,
        } = task;
        let saved = self.hooks.exchange_context(context);
        let result = callback(&args);
        self.stats.executed.set(self.stats.executed.get() + 1);
        match result {
            Ok(()) => telemetry::record_task_completed(),
            Err(error) => {
                self.stats.failed.set(self.stats.failed.get() + 1);
                telemetry::record_task_failure();
                tracing::debug!("task failed; forwarding to the uncaught-failure hook");
                // Reported before the context swap below so the hook still
                // observes the failing task's ambient context.
                self.hooks.report_uncaught(error);
            }
        }
        let _ = self.hooks.exchange_context(saved);
    }

    /// Tasks currently waiting to run. Hosts use this (or [`is_empty`])
    /// to decide whether their loop has pending work.
    ///
    /// [`is_empty`]: TaskScheduler::is_empty
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Snapshot of the scheduler's lifetime counters.
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            scheduled: self.stats.scheduled.get(),
            executed: self.stats.executed.get(),
            failed: self.stats.failed.get(),
            drain_passes: self.stats.drain_passes.get(),
            microtask_flushes: self.stats.microtask_flushes.get(),
        }
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
