//! Queued task record.

use super::hooks::HostHooks;

/// Callback type stored for a scheduled task. Receives the task's
/// argument slice; an `Err` is routed to [`HostHooks::report_uncaught`].
pub(crate) type TaskCallback<H> = Box<
    dyn FnOnce(&[<H as HostHooks>::Value]) -> Result<(), <H as HostHooks>::Error>,
>;

/// A scheduled callback plus everything needed to run it later.
pub(crate) struct Task<H: HostHooks> {
    pub(crate) callback: TaskCallback<H>,
    /// Arguments handed to the callback. An empty slice means "no
    /// arguments"; there is no separate zero-arg representation.
    pub(crate) args: Box<[H::Value]>,
    /// Ambient context captured at schedule time, installed for the
    /// duration of the run.
    pub(crate) context: H::Context,
}
