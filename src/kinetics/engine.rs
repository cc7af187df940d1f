//! Fixed-step integration of the occupancy vector for one run.

use super::mechanism::{mechanism_for, InhibitionMechanism};
use super::{EnzymeStateVector, RateConstants};
use crate::config::Mechanism;

/// Owns the occupancy vector of one run and advances it one step at a time.
///
/// The engine never rejects a state; conservation is checked by the caller.
#[derive(Debug)]
pub struct KineticStateEngine {
    state: EnzymeStateVector,
    rates: RateConstants,
    mechanism: Box<dyn InhibitionMechanism>,
    /// Number of steps taken
    pub step_count: u64,
}

impl KineticStateEngine {
    /// Create an engine seeded with `initial`
    pub fn new(initial: EnzymeStateVector, rates: RateConstants, mechanism: Mechanism) -> Self {
        Self::with_strategy(initial, rates, mechanism_for(mechanism))
    }

    /// Create an engine with an explicit mechanism strategy
    pub fn with_strategy(
        initial: EnzymeStateVector,
        rates: RateConstants,
        mechanism: Box<dyn InhibitionMechanism>,
    ) -> Self {
        Self {
            state: initial,
            rates,
            mechanism,
            step_count: 0,
        }
    }

    /// Advance one step at the given inhibitor concentration and return the new state
    ///
    /// Valid while every rate·dt is much smaller than 1.
    pub fn step(&mut self, dt_sec: f64, inhibitor_M: f64) -> EnzymeStateVector {
        self.state = self
            .mechanism
            .advance(&self.state, &self.rates, inhibitor_M, dt_sec);
        self.step_count += 1;
        self.state
    }

    /// Current occupancy
    pub fn state(&self) -> &EnzymeStateVector {
        &self.state
    }

    /// Rate constants of this run
    pub fn rates(&self) -> &RateConstants {
        &self.rates
    }

    /// Mechanism strategy name
    pub fn mechanism_name(&self) -> &'static str {
        self.mechanism.name()
    }

    /// Instantaneous product formation rate, kcat · [substrate-bound] (M/s)
    pub fn product_rate_M_per_sec(&self) -> f64 {
        self.rates.catalysis_per_sec * self.state.substrate_bound_M
    }

    /// Largest rate·dt over all compartments at the given inhibitor concentration
    ///
    /// Values approaching 1 mean the step is too coarse for the scheme.
    pub fn stiffness(&self, dt_sec: f64, inhibitor_M: f64) -> f64 {
        self.mechanism
            .exit_rates(&self.rates, inhibitor_M)
            .fastest_per_sec()
            * dt_sec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worked_example_rates() -> RateConstants {
        RateConstants {
            catalysis_per_sec: 0.05,
            active_to_inactive_per_sec: 0.1,
            inactive_to_active_per_sec: 0.1,
            substrate_on_per_M_per_sec: 0.3,
            substrate_off_per_sec: 0.2,
            inhibitor_on_per_M_per_sec: 1.0e5,
            inhibitor_off_per_sec: 0.001,
            substrate_M: 1.0,
        }
    }

    fn equal_thirds() -> EnzymeStateVector {
        EnzymeStateVector {
            active_unbound_M: 1.0 / 3.0,
            substrate_bound_M: 1.0 / 3.0,
            inactive_unbound_M: 1.0 / 3.0,
            inhibited_M: 0.0,
        }
    }

    #[test]
    fn test_worked_step_substrate_bound() {
        // (1/3)(1 - 0.25·0.01) + (1/3)(0.4·0.01)(0.3/0.4) = 0.3325 + 0.001
        for mechanism in [Mechanism::InactiveConformation, Mechanism::ActiveConformation] {
            let mut engine = KineticStateEngine::new(equal_thirds(), worked_example_rates(), mechanism);
            let next = engine.step(0.01, 0.0);
            assert!(
                (next.substrate_bound_M - 0.3335).abs() < 1e-6,
                "{:?}: {}",
                mechanism,
                next.substrate_bound_M
            );
        }
    }

    #[test]
    fn test_step_updates_state_and_count() {
        let mut engine =
            KineticStateEngine::new(equal_thirds(), worked_example_rates(), Mechanism::InactiveConformation);
        let next = engine.step(0.01, 1e-6);
        assert_eq!(engine.step_count, 1);
        assert_eq!(*engine.state(), next);
        assert!(next.inhibited_M > 0.0);
    }

    #[test]
    fn test_product_rate() {
        let engine =
            KineticStateEngine::new(equal_thirds(), worked_example_rates(), Mechanism::ActiveConformation);
        assert!((engine.product_rate_M_per_sec() - 0.05 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_stiffness() {
        let engine =
            KineticStateEngine::new(equal_thirds(), worked_example_rates(), Mechanism::ActiveConformation);
        // Active-unbound exit: 0.1 + 0.3 + 1e5·1e-5 = 1.4 /s
        assert!((engine.stiffness(0.01, 1e-5) - 0.014).abs() < 1e-12);
    }

    #[test]
    fn test_stiffness_follows_mechanism() {
        let inactive =
            KineticStateEngine::new(equal_thirds(), worked_example_rates(), Mechanism::InactiveConformation);
        let active =
            KineticStateEngine::new(equal_thirds(), worked_example_rates(), Mechanism::ActiveConformation);
        // kon(I)·C = 30 /s lands on inactive-unbound (30.1) or active-unbound (30.4)
        assert!((inactive.stiffness(0.01, 3e-4) - 0.301).abs() < 1e-12);
        assert!((active.stiffness(0.01, 3e-4) - 0.304).abs() < 1e-12);
        assert_eq!(inactive.mechanism_name(), "inactive_conformation");
        assert_eq!(active.mechanism_name(), "active_conformation");
    }

    #[test]
    fn test_approaches_zero_drug_equilibrium() {
        // Detailed balance with f = 1 and [S]/KM = 1 keeps equal thirds stationary
        // when kon(S)·[S] = koff(S) + kcat.
        let rates = RateConstants {
            substrate_on_per_M_per_sec: 0.25,
            ..worked_example_rates()
        };
        let mut engine = KineticStateEngine::new(equal_thirds(), rates, Mechanism::InactiveConformation);
        for _ in 0..1000 {
            engine.step(0.01, 0.0);
        }
        let s = engine.state();
        assert!((s.substrate_bound_M - 1.0 / 3.0).abs() < 1e-12);
        assert!((s.inactive_unbound_M - 1.0 / 3.0).abs() < 1e-12);
    }
}
