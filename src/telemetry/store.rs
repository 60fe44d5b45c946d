//! Value-oriented metrics capture for host export.
//!
//! Emissions through the `metrics` facade dispatch to a global recorder;
//! [`init_metrics`] installs one that folds every emission into a
//! [`MetricsStore`] the host can poll or serialize. Registered handles
//! share their cell with the store, so recording never takes the map
//! locks after the first touch of a name.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use metrics::{
    Counter, CounterFn, Gauge, GaugeFn, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder,
    SharedString, Unit,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from metrics initialization.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("a global metrics recorder is already installed")]
    AlreadyInstalled,
}

/// Snapshot of every metric the store has seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub counters: HashMap<String, u64>,
    pub gauges: HashMap<String, f64>,
    pub histograms: HashMap<String, HistogramSummary>,
}

/// Aggregate view of one histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSummary {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

/// CAS loop applying `f` to an f64 stored as bits in an `AtomicU64`.
fn update_f64(cell: &AtomicU64, f: impl Fn(f64) -> f64) {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        let next = f(f64::from_bits(current)).to_bits();
        match cell.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(observed) => current = observed,
        }
    }
}

/// Running aggregates for one histogram, all lock-free.
struct HistogramCells {
    count: AtomicU64,
    /// f64 bits stored as u64, as are `min` and `max`.
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl HistogramCells {
    fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0.0f64.to_bits()),
            min: AtomicU64::new(f64::INFINITY.to_bits()),
            max: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
        }
    }

    fn record(&self, value: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        update_f64(&self.sum, |current| current + value);
        update_f64(&self.min, |current| current.min(value));
        update_f64(&self.max, |current| current.max(value));
    }

    fn summary(&self) -> HistogramSummary {
        let count = self.count.load(Ordering::Relaxed);
        HistogramSummary {
            count,
            sum: f64::from_bits(self.sum.load(Ordering::Relaxed)),
            min: if count == 0 {
                0.0
            } else {
                f64::from_bits(self.min.load(Ordering::Relaxed))
            },
            max: if count == 0 {
                0.0
            } else {
                f64::from_bits(self.max.load(Ordering::Relaxed))
            },
        }
    }
}

/// Thread-safe store behind the recorder bridge.
///
/// Usable standalone in tests; production code reaches it through the
/// handle returned by [`init_metrics`].
#[derive(Default)]
pub struct MetricsStore {
    counters: RwLock<HashMap<String, Arc<AtomicU64>>>,
    gauges: RwLock<HashMap<String, Arc<AtomicU64>>>,
    histograms: RwLock<HashMap<String, Arc<HistogramCells>>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared cell for the named counter, creating it on first touch.
    pub(crate) fn counter_cell(&self, name: &str) -> Arc<AtomicU64> {
        if let Some(cell) = self.counters.read().unwrap().get(name) {
            return Arc::clone(cell);
        }
        let mut counters = self.counters.write().unwrap();
        Arc::clone(counters.entry(name.to_string()).or_default())
    }

    pub(crate) fn gauge_cell(&self, name: &str) -> Arc<AtomicU64> {
        if let Some(cell) = self.gauges.read().unwrap().get(name) {
            return Arc::clone(cell);
        }
        let mut gauges = self.gauges.write().unwrap();
        Arc::clone(gauges.entry(name.to_string()).or_default())
    }

    fn histogram_cells(&self, name: &str) -> Arc<HistogramCells> {
        if let Some(cells) = self.histograms.read().unwrap().get(name) {
            return Arc::clone(cells);
        }
        let mut histograms = self.histograms.write().unwrap();
        Arc::clone(
            histograms
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(HistogramCells::new())),
        )
    }

    /// Increment the named counter directly, bypassing the facade.
    pub fn increment_counter(&self, name: &str, value: u64) {
        self.counter_cell(name).fetch_add(value, Ordering::Relaxed);
    }

    /// Set the named gauge directly, bypassing the facade.
    pub fn set_gauge(&self, name: &str, value: f64) {
        self.gauge_cell(name).store(value.to_bits(), Ordering::Relaxed);
    }

    /// Record a histogram observation directly, bypassing the facade.
    pub fn record_histogram(&self, name: &str, value: f64) {
        self.histogram_cells(name).record(value);
    }

    /// Point-in-time copy of every metric.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self
                .counters
                .read()
                .unwrap()
                .iter()
                .map(|(name, cell)| (name.clone(), cell.load(Ordering::Relaxed)))
                .collect(),
            gauges: self
                .gauges
                .read()
                .unwrap()
                .iter()
                .map(|(name, cell)| (name.clone(), f64::from_bits(cell.load(Ordering::Relaxed))))
                .collect(),
            histograms: self
                .histograms
                .read()
                .unwrap()
                .iter()
                .map(|(name, cells)| (name.clone(), cells.summary()))
                .collect(),
        }
    }
}

struct CounterHandle(Arc<AtomicU64>);

impl CounterFn for CounterHandle {
    fn increment(&self, value: u64) {
        self.0.fetch_add(value, Ordering::Relaxed);
    }

    fn absolute(&self, value: u64) {
        self.0.fetch_max(value, Ordering::Relaxed);
    }
}

struct GaugeHandle(Arc<AtomicU64>);

impl GaugeFn for GaugeHandle {
    fn increment(&self, value: f64) {
        update_f64(&self.0, |current| current + value);
    }

    fn decrement(&self, value: f64) {
        update_f64(&self.0, |current| current - value);
    }

    fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

struct HistogramHandle(Arc<HistogramCells>);

impl HistogramFn for HistogramHandle {
    fn record(&self, value: f64) {
        self.0.record(value);
    }
}

/// Recorder that folds facade emissions into a shared [`MetricsStore`].
struct StoreRecorder {
    store: Arc<MetricsStore>,
}

impl Recorder for StoreRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(CounterHandle(self.store.counter_cell(key.name()))))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Arc::new(GaugeHandle(self.store.gauge_cell(key.name()))))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(HistogramHandle(
            self.store.histogram_cells(key.name()),
        )))
    }
}

/// Install a store-backed global metrics recorder and return the store.
///
/// Call once at startup; later calls (or a recorder installed by the
/// host) fail with [`MetricsError::AlreadyInstalled`]. Skipping this
/// leaves the facade's no-op recorder in place, which is fine.
pub fn init_metrics() -> Result<Arc<MetricsStore>, MetricsError> {
    let store = Arc::new(MetricsStore::new());
    metrics::set_global_recorder(StoreRecorder {
        store: Arc::clone(&store),
    })
    .map_err(|_| MetricsError::AlreadyInstalled)?;
    Ok(store)
}
