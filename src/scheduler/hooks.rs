//! Host integration contract for the task scheduler.

/// Hooks an embedding host supplies to [`TaskScheduler`].
///
/// Everything takes `&self`: the scheduler owns the hooks and calls them
/// from its own thread, sometimes reentrantly from inside a drain, so
/// stateful hosts use interior mutability (`Cell`/`RefCell`).
///
/// [`TaskScheduler`]: crate::scheduler::TaskScheduler
pub trait HostHooks {
    /// Ambient-context snapshot observed by task bodies (think async-local
    /// storage frames). Opaque to the scheduler.
    type Context: 'static;
    /// Argument values passed to task callbacks.
    type Value: 'static;
    /// Failure payload a task callback can produce.
    type Error: 'static;

    /// Snapshot the currently installed ambient context. Called once per
    /// accepted `schedule`, at schedule time.
    fn capture_context(&self) -> Self::Context;

    /// Install `context` as current and return the previously installed
    /// one. The scheduler brackets every task body with an exchange and a
    /// restoring exchange.
    fn exchange_context(&self, context: Self::Context) -> Self::Context;

    /// Flush the host's microtask queue. Runs after each batch of tasks
    /// inside [`drain`], and may itself schedule further tasks.
    ///
    /// [`drain`]: crate::scheduler::TaskScheduler::drain
    fn drain_microtasks(&self);

    /// Sink for task failures nothing else will handle. Runs while the
    /// failing task's ambient context is still installed.
    fn report_uncaught(&self, error: Self::Error);

    /// One-way teardown flag. While it returns `true`, `schedule` becomes
    /// a silent no-op; it is consulted at schedule time only, never
    /// mid-drain.
    fn is_shutting_down(&self) -> bool {
        false
    }

    /// Fired when a push takes the task queue from empty to non-empty,
    /// e.g. so an owning event loop knows to stay alive.
    fn notify_pending(&self) {}
}
