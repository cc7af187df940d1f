//! Down-sampling of the step-resolution trajectory to output records.

use serde::{Deserialize, Serialize};

use crate::kinetics::EnzymeStateVector;
use crate::pharmacokinetics::SECONDS_PER_DAY;

/// One sampled point of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRecord {
    /// Elapsed time since the first dose (days)
    pub elapsed_days: f64,
    /// Plasma inhibitor concentration (nM)
    pub concentration_nM: f64,
    /// Substrate-bound occupancy (M)
    pub substrate_bound_M: f64,
    /// Active-unbound occupancy (M)
    pub active_unbound_M: f64,
    /// Inactive-unbound occupancy (M)
    pub inactive_unbound_M: f64,
    /// Inhibitor-bound occupancy (M)
    pub inhibited_M: f64,
    /// Summed occupancy (M)
    pub total_M: f64,
    /// Product formation rate, kcat · substrate-bound (M/s)
    pub product_rate_M_per_sec: f64,
}

impl TimeSeriesRecord {
    /// Capture the current state
    pub fn new(
        elapsed_sec: f64,
        concentration_M: f64,
        state: &EnzymeStateVector,
        catalysis_per_sec: f64,
    ) -> Self {
        Self {
            elapsed_days: elapsed_sec / SECONDS_PER_DAY,
            concentration_nM: concentration_M * 1e9,
            substrate_bound_M: state.substrate_bound_M,
            active_unbound_M: state.active_unbound_M,
            inactive_unbound_M: state.inactive_unbound_M,
            inhibited_M: state.inhibited_M,
            total_M: state.total_M(),
            product_rate_M_per_sec: catalysis_per_sec * state.substrate_bound_M,
        }
    }
}

/// Emits one record per sample interval of simulated time
#[derive(Debug, Clone)]
pub struct Sampler {
    interval_sec: f64,
    steps_since_emit: u64,
}

/// Relative slack on the interval for rounding in `steps · dt`
const INTERVAL_RELATIVE_SLACK: f64 = 1e-12;

impl Sampler {
    /// Create a sampler; 60 s gives one record per simulated minute
    pub fn new(interval_sec: f64) -> Self {
        Self {
            interval_sec,
            steps_since_emit: 0,
        }
    }

    /// Account for one step of `dt_sec`; true when a record is due.
    ///
    /// A record is due once `steps · dt` since the last emission reaches the
    /// interval, so a step that does not divide the interval never emits early.
    /// The step counter resets on every emission.
    pub fn advance(&mut self, dt_sec: f64) -> bool {
        self.steps_since_emit += 1;
        let accumulated_sec = self.steps_since_emit as f64 * dt_sec;
        if accumulated_sec >= self.interval_sec * (1.0 - INTERVAL_RELATIVE_SLACK) {
            self.steps_since_emit = 0;
            true
        } else {
            false
        }
    }

    /// Sample interval (s)
    pub fn interval_sec(&self) -> f64 {
        self.interval_sec
    }
}
