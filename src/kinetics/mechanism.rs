//! Per-drug inhibition mechanisms for the fixed-step occupancy update.
//!
//! Each compartment keeps the surviving fraction `1 - R·dt` of its previous
//! value, where `R` is its total exit rate, and the departing mass `R·dt`
//! is split among destinations by branching ratio `k_i / R`. All rates are
//! frozen at the start of the step, including the inhibitor binding rate
//! at the current drug concentration.

use std::fmt;

use super::{EnzymeStateVector, RateConstants};
use crate::config::Mechanism;

/// Fraction of a compartment remaining after one step
#[inline]
pub fn surviving_fraction(rate_per_sec: f64, dt_sec: f64) -> f64 {
    1.0 - rate_per_sec * dt_sec
}

/// Fraction of a compartment leaving during one step
#[inline]
pub fn departing_fraction(rate_per_sec: f64, dt_sec: f64) -> f64 {
    1.0 - surviving_fraction(rate_per_sec, dt_sec)
}

/// Outgoing mass of one compartment over one step
#[derive(Debug, Clone, Copy)]
struct Outflow {
    remaining: f64,
    departing: f64,
    total_rate_per_sec: f64,
}

impl Outflow {
    fn new(amount: f64, total_rate_per_sec: f64, dt_sec: f64) -> Self {
        Self {
            remaining: amount * surviving_fraction(total_rate_per_sec, dt_sec),
            departing: amount * departing_fraction(total_rate_per_sec, dt_sec),
            total_rate_per_sec,
        }
    }

    /// Departing mass carried by one channel
    fn via(&self, rate_per_sec: f64) -> f64 {
        if self.total_rate_per_sec > 0.0 {
            self.departing * rate_per_sec / self.total_rate_per_sec
        } else {
            0.0
        }
    }
}

/// Total exit rate of each compartment at one inhibitor concentration (/s)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitRates {
    /// Active-unbound (/s)
    pub active_unbound_per_sec: f64,
    /// Substrate-bound (/s)
    pub substrate_bound_per_sec: f64,
    /// Inactive-unbound (/s)
    pub inactive_unbound_per_sec: f64,
    /// Inhibited (/s)
    pub inhibited_per_sec: f64,
}

impl ExitRates {
    /// Largest exit rate (/s)
    pub fn fastest_per_sec(&self) -> f64 {
        self.active_unbound_per_sec
            .max(self.substrate_bound_per_sec)
            .max(self.inactive_unbound_per_sec)
            .max(self.inhibited_per_sec)
    }
}

/// Drug-specific redistribution of occupancy over one timestep
pub trait InhibitionMechanism: Send + Sync + fmt::Debug {
    /// Mechanism name for logs and exports
    fn name(&self) -> &'static str;

    /// Exit rate of every compartment at inhibitor concentration `inhibitor_M`
    fn exit_rates(&self, rates: &RateConstants, inhibitor_M: f64) -> ExitRates;

    /// Occupancy after one step of `dt_sec` at inhibitor concentration `inhibitor_M`
    fn advance(
        &self,
        state: &EnzymeStateVector,
        rates: &RateConstants,
        inhibitor_M: f64,
        dt_sec: f64,
    ) -> EnzymeStateVector;
}

/// Strategy for a mechanism tag
pub fn mechanism_for(mechanism: Mechanism) -> Box<dyn InhibitionMechanism> {
    match mechanism {
        Mechanism::InactiveConformation => Box::new(InactiveConformationBinding),
        Mechanism::ActiveConformation => Box::new(ActiveConformationBinding),
    }
}

/// Inhibitor binds the inactive-unbound enzyme, competing with the inactive→active transition.
///
/// ```text
///  Substrate-Bound ──kcat+koff(S)──▶ Active-Unbound ──k(A→I)──▶ Inactive-Unbound ──kon(I)·[I]──▶ Inhibited
///        ▲                              │      ▲                       │      ▲                       │
///        └──────────kon(S)·[S]──────────┘      └────────k(I→A)─────────┘      └───────koff(I)─────────┘
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct InactiveConformationBinding;

impl InhibitionMechanism for InactiveConformationBinding {
    fn name(&self) -> &'static str {
        "inactive_conformation"
    }

    fn exit_rates(&self, rates: &RateConstants, inhibitor_M: f64) -> ExitRates {
        ExitRates {
            active_unbound_per_sec: rates.active_to_inactive_per_sec
                + rates.substrate_binding_per_sec(),
            substrate_bound_per_sec: rates.substrate_bound_exit_per_sec(),
            inactive_unbound_per_sec: rates.inhibitor_binding_per_sec(inhibitor_M)
                + rates.inactive_to_active_per_sec,
            inhibited_per_sec: rates.inhibitor_off_per_sec,
        }
    }

    fn advance(
        &self,
        state: &EnzymeStateVector,
        rates: &RateConstants,
        inhibitor_M: f64,
        dt_sec: f64,
    ) -> EnzymeStateVector {
        let substrate_binding = rates.substrate_binding_per_sec();
        let inhibitor_binding = rates.inhibitor_binding_per_sec(inhibitor_M);
        let exits = self.exit_rates(rates, inhibitor_M);

        let active = Outflow::new(state.active_unbound_M, exits.active_unbound_per_sec, dt_sec);
        let bound = Outflow::new(state.substrate_bound_M, exits.substrate_bound_per_sec, dt_sec);
        let inactive = Outflow::new(state.inactive_unbound_M, exits.inactive_unbound_per_sec, dt_sec);
        let inhibited = Outflow::new(state.inhibited_M, exits.inhibited_per_sec, dt_sec);

        EnzymeStateVector {
            substrate_bound_M: bound.remaining + active.via(substrate_binding),
            active_unbound_M: active.remaining
                + inactive.via(rates.inactive_to_active_per_sec)
                + bound.departing,
            inactive_unbound_M: inactive.remaining
                + active.via(rates.active_to_inactive_per_sec)
                + inhibited.departing,
            inhibited_M: inhibited.remaining + inactive.via(inhibitor_binding),
        }
    }
}

/// Inhibitor binds the active-unbound enzyme, competing three-way with
/// substrate binding and the active→inactive transition.
///
/// Bound drug dissociates back to the active-unbound compartment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveConformationBinding;

impl InhibitionMechanism for ActiveConformationBinding {
    fn name(&self) -> &'static str {
        "active_conformation"
    }

    fn exit_rates(&self, rates: &RateConstants, inhibitor_M: f64) -> ExitRates {
        ExitRates {
            active_unbound_per_sec: rates.active_to_inactive_per_sec
                + rates.substrate_binding_per_sec()
                + rates.inhibitor_binding_per_sec(inhibitor_M),
            substrate_bound_per_sec: rates.substrate_bound_exit_per_sec(),
            inactive_unbound_per_sec: rates.inactive_to_active_per_sec,
            inhibited_per_sec: rates.inhibitor_off_per_sec,
        }
    }

    fn advance(
        &self,
        state: &EnzymeStateVector,
        rates: &RateConstants,
        inhibitor_M: f64,
        dt_sec: f64,
    ) -> EnzymeStateVector {
        let substrate_binding = rates.substrate_binding_per_sec();
        let inhibitor_binding = rates.inhibitor_binding_per_sec(inhibitor_M);
        let exits = self.exit_rates(rates, inhibitor_M);

        let active = Outflow::new(state.active_unbound_M, exits.active_unbound_per_sec, dt_sec);
        let bound = Outflow::new(state.substrate_bound_M, exits.substrate_bound_per_sec, dt_sec);
        let inactive = Outflow::new(state.inactive_unbound_M, exits.inactive_unbound_per_sec, dt_sec);
        let inhibited = Outflow::new(state.inhibited_M, exits.inhibited_per_sec, dt_sec);

        EnzymeStateVector {
            substrate_bound_M: bound.remaining + active.via(substrate_binding),
            active_unbound_M: active.remaining
                + bound.departing
                + inactive.departing
                + inhibited.departing,
            inactive_unbound_M: inactive.remaining + active.via(rates.active_to_inactive_per_sec),
            inhibited_M: inhibited.remaining + active.via(inhibitor_binding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> RateConstants {
        RateConstants {
            catalysis_per_sec: 0.05,
            active_to_inactive_per_sec: 0.1,
            inactive_to_active_per_sec: 0.1,
            substrate_on_per_M_per_sec: 0.3,
            substrate_off_per_sec: 0.2,
            inhibitor_on_per_M_per_sec: 2.0e6,
            inhibitor_off_per_sec: 0.01,
            substrate_M: 1.0,
        }
    }

    fn third() -> EnzymeStateVector {
        EnzymeStateVector {
            active_unbound_M: 1.0 / 3.0,
            substrate_bound_M: 1.0 / 3.0,
            inactive_unbound_M: 1.0 / 3.0,
            inhibited_M: 0.0,
        }
    }

    #[test]
    fn test_fractions() {
        assert!((surviving_fraction(0.25, 0.01) - 0.9975).abs() < 1e-15);
        assert!((departing_fraction(0.25, 0.01) - 0.0025).abs() < 1e-15);
    }

    #[test]
    fn test_conservation_both_mechanisms() {
        let inhibitor_M = 50e-9;
        let mechanisms = [
            mechanism_for(Mechanism::InactiveConformation),
            mechanism_for(Mechanism::ActiveConformation),
        ];
        for mechanism in mechanisms {
            let mut state = third();
            for _ in 0..10_000 {
                state = mechanism.advance(&state, &rates(), inhibitor_M, 0.01);
            }
            let total = state.total_M();
            assert!((total - 1.0).abs() < 1e-9, "{}: {}", mechanism.name(), total);
            assert!(state.inhibited_M > 0.0);
        }
    }

    #[test]
    fn test_mechanisms_agree_without_drug() {
        let a = InactiveConformationBinding.advance(&third(), &rates(), 0.0, 0.01);
        let b = ActiveConformationBinding.advance(&third(), &rates(), 0.0, 0.01);
        assert!((a.substrate_bound_M - b.substrate_bound_M).abs() < 1e-15);
        assert!((a.inactive_unbound_M - b.inactive_unbound_M).abs() < 1e-15);
        assert!((a.active_unbound_M - b.active_unbound_M).abs() < 1e-15);
    }

    #[test]
    fn test_drug_draws_from_targeted_conformation() {
        let inhibitor_M = 1e-6;
        let inactive = InactiveConformationBinding.advance(&third(), &rates(), inhibitor_M, 0.01);
        let active = ActiveConformationBinding.advance(&third(), &rates(), inhibitor_M, 0.01);
        // Type II drug depletes inactive-unbound, type I depletes active-unbound
        assert!(inactive.inactive_unbound_M < active.inactive_unbound_M);
        assert!(active.active_unbound_M < inactive.active_unbound_M);
    }

    #[test]
    fn test_exit_rates_follow_drug_target() {
        let inhibitor_M = 1e-6;
        let binding = rates().inhibitor_binding_per_sec(inhibitor_M);
        let inactive = InactiveConformationBinding.exit_rates(&rates(), inhibitor_M);
        let active = ActiveConformationBinding.exit_rates(&rates(), inhibitor_M);

        assert!((inactive.inactive_unbound_per_sec - (0.1 + binding)).abs() < 1e-12);
        assert!((inactive.active_unbound_per_sec - 0.4).abs() < 1e-12);
        // Active-conformation binders leave the inactive exit untouched
        assert!((active.inactive_unbound_per_sec - 0.1).abs() < 1e-12);
        assert!((active.active_unbound_per_sec - (0.4 + binding)).abs() < 1e-12);
        assert!((active.fastest_per_sec() - (0.4 + binding)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_compartment_with_zero_exit_rate() {
        let mut r = rates();
        r.inactive_to_active_per_sec = 0.0;
        let state = EnzymeStateVector {
            inactive_unbound_M: 1.0,
            ..Default::default()
        };
        let next = InactiveConformationBinding.advance(&state, &r, 0.0, 0.01);
        assert!(next.is_physical());
        assert!((next.inactive_unbound_M - 1.0).abs() < 1e-15);
    }
}
