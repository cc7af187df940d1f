//! Conservation check on the summed enzyme occupancy.

use crate::kinetics::EnzymeStateVector;

/// Result of one conservation check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilityCheck {
    /// Summed occupancy within tolerance of the enzyme total
    Stable,
    /// Summed occupancy drifted past tolerance or is not finite
    Diverged {
        /// Summed occupancy at detection (M)
        total_M: f64,
    },
}

/// Detects breakdown of the first-order scheme.
///
/// The scheme conserves total enzyme only while every rate·dt is small.
/// The run must stop once summed occupancy leaves `[1 - tol, 1 + tol] · Etotal`
/// or any compartment falls below `-tol · Etotal`. Past rate·dt = 1 the
/// split drives compartments negative long before the sum drifts.
#[derive(Debug, Clone, Copy)]
pub struct StabilityMonitor {
    enzyme_total_M: f64,
    tolerance: f64,
}

impl StabilityMonitor {
    /// Create a monitor for the given total and relative tolerance (0.01 = 1%)
    pub fn new(enzyme_total_M: f64, tolerance: f64) -> Self {
        Self {
            enzyme_total_M,
            tolerance,
        }
    }

    /// Summed occupancy at or above which the run is truncated (M)
    pub fn upper_limit_M(&self) -> f64 {
        self.enzyme_total_M * (1.0 + self.tolerance)
    }

    /// Summed occupancy at or below which the run is truncated (M)
    pub fn lower_limit_M(&self) -> f64 {
        self.enzyme_total_M * (1.0 - self.tolerance)
    }

    /// Most negative occupancy tolerated in a single compartment (M)
    pub fn negative_limit_M(&self) -> f64 {
        -self.enzyme_total_M * self.tolerance
    }

    /// Check the state produced by the latest step
    pub fn check(&self, state: &EnzymeStateVector) -> StabilityCheck {
        let total_M = state.total_M();
        if !total_M.is_finite()
            || total_M >= self.upper_limit_M()
            || total_M <= self.lower_limit_M()
            || state.min_compartment_M() <= self.negative_limit_M()
        {
            StabilityCheck::Diverged { total_M }
        } else {
            StabilityCheck::Stable
        }
    }
}
