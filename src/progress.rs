/*!
 * Cycle progress tracking.
 *
 * `ProgressRecorder` owns the process-lifetime cycle counter. Each completed
 * cycle bumps it by one and emits a metric record plus a log line.
 */

use log::info;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metric name emitted once per counted cycle
pub const CYCLE_COMPLETED_METRIC: &str = "cycle_completed";

/// One metric data point
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub step: u64,
    pub name: &'static str,
    pub value: f64,
}

impl std::fmt::Display for MetricRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Metric - Step: {}, Name: {}, Value: {}", self.step, self.name, self.value)
    }
}

/// Destination for metric records
pub trait MetricSink: Send + Sync {
    fn record(&self, record: &MetricRecord);
}

/// Writes metric records through the logger
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMetricSink;

impl MetricSink for LogMetricSink {
    fn record(&self, record: &MetricRecord) {
        info!(target: "metrics", "{}", record);
    }
}

/// Keeps metric records in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryMetricSink {
    records: Arc<Mutex<Vec<MetricRecord>>>,
}

impl MemoryMetricSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records so far
    pub fn records(&self) -> Vec<MetricRecord> {
        self.records.lock().clone()
    }
}

impl MetricSink for MemoryMetricSink {
    fn record(&self, record: &MetricRecord) {
        self.records.lock().push(record.clone());
    }
}

/// Monotonic cycle counter with metric reporting
pub struct ProgressRecorder {
    counter: AtomicU64,
    sink: Box<dyn MetricSink>,
}

impl std::fmt::Debug for ProgressRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressRecorder")
            .field("counter", &self.cycles_completed())
            .finish_non_exhaustive()
    }
}

impl Default for ProgressRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRecorder {
    /// Recorder reporting metrics through the logger
    pub fn new() -> Self {
        Self::with_sink(LogMetricSink)
    }

    pub fn with_sink(sink: impl MetricSink + 'static) -> Self {
        Self {
            counter: AtomicU64::new(0),
            sink: Box::new(sink),
        }
    }

    /// Count one completed cycle and return the new total
    pub fn record_cycle_completion(&self) -> u64 {
        let cycle = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.sink.record(&MetricRecord {
            step: cycle,
            name: CYCLE_COMPLETED_METRIC,
            value: cycle as f64,
        });
        info!("--- Cycle {} completed. ---", cycle);
        cycle
    }

    pub fn cycles_completed(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}
