//! Telemetry: structured logging and metrics capture.
//!
//! Everything here is optional wiring for the host. The scheduler emits
//! through the `tracing` and `metrics` facades either way; installing the
//! subscriber and recorder is what makes the output land somewhere.

mod logging;
mod metrics;
mod store;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use metrics::{
    record_drain_completed, record_queue_depth, record_task_completed, record_task_failure,
    record_task_scheduled,
};
pub use store::{init_metrics, HistogramSummary, MetricsError, MetricsSnapshot, MetricsStore};
