use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::app_config::{Config, TranslationDirection};
use crate::cycle_executor::{CycleExecutor, CycleOutcome, CycleReport};
use crate::errors::CycleError;
use crate::progress::ProgressRecorder;
use crate::translation::TranslationBackend;

// @module: Multi-cycle run controller

/// Why a run ended
#[derive(Debug)]
pub enum StopReason {
    /// All requested cycles ran
    Completed,
    /// The input pool of the next direction had no pending file
    PoolExhausted(PathBuf),
    /// Cancellation was requested between cycles
    Cancelled,
    /// A cycle hit an unexpected error
    Failed(CycleError),
}

/// Summary of a multi-cycle run
#[derive(Debug)]
pub struct RunSummary {
    /// Cycles counted during this run
    pub cycles_completed: u64,
    pub stop_reason: StopReason,
    /// Per-cycle reports in execution order
    pub reports: Vec<CycleReport>,
}

impl RunSummary {
    /// Whether the run ended on an error rather than a normal stop
    pub fn is_failure(&self) -> bool {
        matches!(self.stop_reason, StopReason::Failed(_))
    }
}

/// Requests a stop at the next cycle boundary
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs the configured number of cycles, alternating direction
pub struct Controller {
    // @field: Number of cycles to attempt; non-positive means none
    cycles: i64,
    // @field: Direction of the first cycle of every run
    initial_direction: TranslationDirection,
    executor: CycleExecutor,
    recorder: Arc<ProgressRecorder>,
    cancel: CancelHandle,
}

impl Controller {
    // @method: Create a controller with a logging progress recorder
    pub fn new(config: &Config, backend: Arc<dyn TranslationBackend>) -> Self {
        Self {
            cycles: config.cycles,
            initial_direction: config.initial_direction,
            executor: CycleExecutor::new(config.pool_layout(), backend),
            recorder: Arc::new(ProgressRecorder::new()),
            cancel: CancelHandle::default(),
        }
    }

    /// Use an externally owned progress recorder
    pub fn with_recorder(mut self, recorder: Arc<ProgressRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn recorder(&self) -> &Arc<ProgressRecorder> {
        &self.recorder
    }

    /// Handle that stops the run before the next cycle starts
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run up to `cycles` cycles starting from the initial direction
    ///
    /// The run stops early on an exhausted pool, a cancellation, or any
    /// cycle error. Translation failures inside a cycle still count.
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary {
            cycles_completed: 0,
            stop_reason: StopReason::Completed,
            reports: Vec::new(),
        };

        if self.cycles <= 0 {
            info!("Cycle count is {}, nothing to do", self.cycles);
            return summary;
        }

        info!(
            "Starting {} cycle(s) from {:?}, initial direction {}",
            self.cycles,
            self.executor.layout().root(),
            self.initial_direction
        );

        let mut direction = self.initial_direction;
        for cycle in 1..=self.cycles {
            if self.cancel.is_cancelled() {
                warn!("Cancellation requested, stopping before cycle {}", cycle);
                summary.stop_reason = StopReason::Cancelled;
                break;
            }

            info!("--- Cycle {}/{}: {} ---", cycle, self.cycles, direction);
            match self.executor.run_cycle(direction).await {
                Ok(report) => {
                    if let CycleOutcome::Failed(diagnostic) = &report.outcome {
                        warn!("Cycle {} wrote a diagnostic for {}: {}", cycle, report.filename, diagnostic);
                    }
                    self.recorder.record_cycle_completion();
                    summary.cycles_completed += 1;
                    summary.reports.push(report);
                    direction = direction.flipped();
                }
                Err(CycleError::EmptyPool(dir)) => {
                    info!("No files left in {:?}, stopping after {} cycle(s)", dir, summary.cycles_completed);
                    summary.stop_reason = StopReason::PoolExhausted(dir);
                    break;
                }
                Err(e) => {
                    error!("Cycle {} ({}) failed, stopping run: {}", cycle, direction, e);
                    summary.stop_reason = StopReason::Failed(e);
                    break;
                }
            }
        }

        info!("Run finished: {} cycle(s) completed", summary.cycles_completed);
        summary
    }
}
