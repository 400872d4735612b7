//! Shared run progress and cancellation
//!
//! A host keeps one clone of [`RunProgress`] and hands another to the run. The
//! run reports which stage it is in and, during sensitivity analysis, how many
//! per-parameter passes are done. Cancellation is honored at run start and
//! between sensitivity passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

use crate::error::SimulationError;

/// Pipeline stage a run has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunStage {
    Idle = 0,
    Sampling = 1,
    Interactions = 2,
    Aggregating = 3,
    Sensitivity = 4,
    Finished = 5,
}

impl RunStage {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RunStage::Sampling,
            2 => RunStage::Interactions,
            3 => RunStage::Aggregating,
            4 => RunStage::Sensitivity,
            5 => RunStage::Finished,
            _ => RunStage::Idle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunStage::Idle => "idle",
            RunStage::Sampling => "sampling",
            RunStage::Interactions => "applying interactions",
            RunStage::Aggregating => "aggregating",
            RunStage::Sensitivity => "sensitivity analysis",
            RunStage::Finished => "finished",
        }
    }
}

#[derive(Debug, Default)]
struct ProgressState {
    stage: AtomicU8,
    passes_completed: AtomicUsize,
    passes_total: AtomicUsize,
    cancelled: AtomicBool,
}

/// Handle shared between a run and its host. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct RunProgress {
    state: Arc<ProgressState>,
}

impl RunProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> RunStage {
        RunStage::from_u8(self.state.stage.load(Ordering::Acquire))
    }

    pub fn enter(&self, stage: RunStage) {
        self.state.stage.store(stage as u8, Ordering::Release);
    }

    /// Switch to [`RunStage::Sensitivity`] with `passes` passes outstanding
    pub fn begin_sensitivity(&self, passes: usize) {
        self.state.passes_completed.store(0, Ordering::Relaxed);
        self.state.passes_total.store(passes, Ordering::Relaxed);
        self.enter(RunStage::Sensitivity);
    }

    pub fn finish_pass(&self) {
        self.state.passes_completed.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn passes_completed(&self) -> usize {
        self.state.passes_completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn passes_total(&self) -> usize {
        self.state.passes_total.load(Ordering::Relaxed)
    }

    /// Share of sensitivity passes done, once sensitivity analysis has started
    pub fn sensitivity_fraction(&self) -> Option<f64> {
        let total = self.passes_total();
        (total > 0).then(|| self.passes_completed() as f64 / total as f64)
    }

    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once cancellation has been requested
    pub fn check(&self) -> Result<(), SimulationError> {
        if self.is_cancelled() {
            Err(SimulationError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Clear everything, including a pending cancellation, before reuse
    pub fn restart(&self) {
        self.state.cancelled.store(false, Ordering::Release);
        self.state.passes_completed.store(0, Ordering::Relaxed);
        self.state.passes_total.store(0, Ordering::Relaxed);
        self.enter(RunStage::Idle);
    }
}
