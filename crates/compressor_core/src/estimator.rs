//! Simulated progress for the compression job.
//!
//! The service reports nothing until it is done, so the estimate is driven by
//! timer ticks and a random roll per tick. It never measures anything.

use std::time::Duration;

/// Cadence at which the app delivers `Msg::Tick`.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Hard ceiling while the job is running; the rest is granted on completion.
pub const RUNNING_CEILING: f64 = 92.0;

const COMPLETE: f64 = 100.0;
/// Largest roll honoured; keeps each step strictly below the band width.
const MAX_ROLL: f64 = 1.0 - f64::EPSILON;
const PHASE_WIDTH: f64 = 15.0;

pub const PHASE_LABELS: [&str; 7] = [
    "Uploading your PDF...",
    "Analyzing document structure...",
    "Rendering pages...",
    "Optimizing images...",
    "Recompressing streams...",
    "Rebuilding the PDF...",
    "Finishing up...",
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressEstimator {
    percent: f64,
    status_index: usize,
    running: bool,
}

impl ProgressEstimator {
    /// Zero the estimate and begin accepting ticks.
    pub fn start(&mut self) {
        *self = Self {
            running: true,
            ..Self::default()
        };
    }

    /// Apply one tick. `roll` is a uniform sample in `[0, 1)`.
    ///
    /// Returns the new phase index when it changed, so callers redraw the label
    /// only on transitions. Ticks are ignored once the estimator is stopped.
    pub fn advance(&mut self, roll: f64) -> Option<usize> {
        if !self.running {
            return None;
        }
        let roll = if roll.is_finite() {
            roll.clamp(0.0, MAX_ROLL)
        } else {
            0.0
        };
        let next = self.percent + band_step(self.percent) * roll;
        self.percent = next.min(RUNNING_CEILING).max(self.percent);

        let index = phase_index(self.percent);
        if index != self.status_index {
            self.status_index = index;
            Some(index)
        } else {
            None
        }
    }

    /// Halt ticking. Safe to call repeatedly; the percent is kept.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and grant the reserved remainder.
    pub fn complete(&mut self) {
        self.running = false;
        self.percent = COMPLETE;
        self.status_index = phase_index(COMPLETE);
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn status_index(&self) -> usize {
        self.status_index
    }

    pub fn label(&self) -> &'static str {
        PHASE_LABELS[self.status_index]
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

fn band_step(percent: f64) -> f64 {
    match percent {
        p if p < 20.0 => 4.0,
        p if p < 50.0 => 2.0,
        p if p < 75.0 => 1.0,
        p if p < 90.0 => 0.3,
        _ => 0.0,
    }
}

fn phase_index(percent: f64) -> usize {
    ((percent / PHASE_WIDTH).floor() as usize).min(PHASE_LABELS.len() - 1)
}
