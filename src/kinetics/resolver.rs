//! Conversion of measured constants into per-run rate constants.
//!
//! The conformational equilibrium enters through the Boltzmann factor
//! f = exp(-ΔG / kB·T), where ΔG is the active/inactive free-energy
//! difference of the variant (wild-type value plus mutant offset).
//!
//! - Detailed balance: k(inactive→active) = k(active→inactive) · f
//! - Steady state:     k_on(S) = (k_off(S) + k_cat) / KM
//! - Inhibitor on-rate from the effective dissociation constant:
//!   k_on(I) = k_off(I) / RD
//!
//! References:
//! - Cheng Y, Prusoff WH. Biochem Pharmacol. 1973;22:3099-3108 (IC50 to Ki)
//! - Wilson C et al. Science. 2015;347:882-886 (conformational selection in kinases)

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EnzymeStateVector;
use crate::config::{DrugRecord, Mechanism, MutantRecord, SimulationParameters};
use crate::error::{require_non_negative, ConfigError, Result};

/// Boltzmann constant (kcal/K)
pub const BOLTZMANN_KCAL_PER_K: f64 = 3.29982916e-27;

/// Avogadro constant (/mol)
pub const AVOGADRO_PER_MOL: f64 = 6.022e23;

/// Which end of the measured free-energy error bar to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaGBound {
    /// Measured offset
    #[default]
    Nominal,
    /// Offset minus its error bound (more active)
    Lower,
    /// Offset plus its error bound (more inactive)
    Upper,
}

impl DeltaGBound {
    /// Every bound, nominal first
    pub const ALL: [DeltaGBound; 3] = [DeltaGBound::Nominal, DeltaGBound::Lower, DeltaGBound::Upper];

    /// Lower-case name used in file names, JSON and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            DeltaGBound::Nominal => "nominal",
            DeltaGBound::Lower => "lower",
            DeltaGBound::Upper => "upper",
        }
    }

    /// Shift applied to the mutant offset (kcal/mol)
    pub fn shift_kcal_per_mol(self, error_kcal_per_mol: f64) -> f64 {
        match self {
            DeltaGBound::Nominal => 0.0,
            DeltaGBound::Lower => -error_kcal_per_mol,
            DeltaGBound::Upper => error_kcal_per_mol,
        }
    }
}

impl FromStr for DeltaGBound {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|bound| bound.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownBound(s.to_string()))
    }
}

/// Transition rate constants for one run, in per-second units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConstants {
    /// Catalysis, substrate-bound → active-unbound (/s)
    pub catalysis_per_sec: f64,
    /// Active → inactive conformational transition (/s)
    pub active_to_inactive_per_sec: f64,
    /// Inactive → active conformational transition (/s)
    pub inactive_to_active_per_sec: f64,
    /// Substrate association (/M/s)
    pub substrate_on_per_M_per_sec: f64,
    /// Substrate dissociation (/s)
    pub substrate_off_per_sec: f64,
    /// Inhibitor association (/M/s)
    pub inhibitor_on_per_M_per_sec: f64,
    /// Inhibitor dissociation (/s)
    pub inhibitor_off_per_sec: f64,
    /// Free substrate concentration, held constant (M)
    pub substrate_M: f64,
}

impl RateConstants {
    /// Pseudo-first-order substrate binding rate (/s)
    #[inline]
    pub fn substrate_binding_per_sec(&self) -> f64 {
        self.substrate_on_per_M_per_sec * self.substrate_M
    }

    /// Pseudo-first-order inhibitor binding rate at the given inhibitor concentration (/s)
    #[inline]
    pub fn inhibitor_binding_per_sec(&self, inhibitor_M: f64) -> f64 {
        self.inhibitor_on_per_M_per_sec * inhibitor_M
    }

    /// Total exit rate of the substrate-bound compartment (/s)
    #[inline]
    pub fn substrate_bound_exit_per_sec(&self) -> f64 {
        self.catalysis_per_sec + self.substrate_off_per_sec
    }
}

/// Everything derived from the measured data for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParameters {
    /// Rate constants
    pub rates: RateConstants,
    /// Equilibrium occupancy at zero inhibitor
    pub initial_state: EnzymeStateVector,
    /// Boltzmann factor f = exp(-ΔG / kB·T)
    pub boltzmann_factor: f64,
    /// Effective inhibitor dissociation constant RD (M)
    pub dissociation_constant_M: f64,
    /// Drug mechanism
    pub mechanism: Mechanism,
}

/// Resolves measured mutant/drug constants into [`ResolvedParameters`]
#[derive(Debug, Clone)]
pub struct ParameterResolver {
    temperature_K: f64,
    substrate_M: f64,
    enzyme_total_M: f64,
    wild_type_delta_g_kcal_per_mol: f64,
}

impl ParameterResolver {
    /// Create a resolver from the global run settings
    pub fn new(params: &SimulationParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            temperature_K: params.temperature_K,
            substrate_M: params.substrate_M,
            enzyme_total_M: params.enzyme_total_M,
            wild_type_delta_g_kcal_per_mol: params.wild_type_delta_g_kcal_per_mol,
        })
    }

    /// Boltzmann factor for a molar free-energy difference (kcal/mol)
    pub fn boltzmann_factor(&self, delta_g_kcal_per_mol: f64) -> f64 {
        let delta_g_kcal = delta_g_kcal_per_mol / AVOGADRO_PER_MOL;
        (-delta_g_kcal / (BOLTZMANN_KCAL_PER_K * self.temperature_K)).exp()
    }

    /// Derive rate constants and the equilibrium seed for one mutant/drug pair
    ///
    /// # Errors
    /// [`ConfigError`] when KM or IC50 is not positive, a rate is negative,
    /// or a derived divisor (Boltzmann factor, RD) is not positive and finite.
    pub fn resolve(
        &self,
        mutant: &MutantRecord,
        drug: &DrugRecord,
        bound: DeltaGBound,
    ) -> Result<ResolvedParameters> {
        if !(mutant.km_uM.is_finite() && mutant.km_uM > 0.0) {
            return Err(ConfigError::NonPositiveMichaelisConstant {
                mutant: mutant.name.clone(),
                km_uM: mutant.km_uM,
            });
        }
        let binding = mutant.binding(&drug.name)?;
        if !(binding.ic50_nM.is_finite() && binding.ic50_nM > 0.0) {
            return Err(ConfigError::NonPositiveIc50 {
                mutant: mutant.name.clone(),
                drug: drug.name.clone(),
                ic50_nM: binding.ic50_nM,
            });
        }

        let catalysis_per_sec = per_minute_to_per_second(require_non_negative(
            "kcat_per_min",
            mutant.kcat_per_min,
        )?);
        let active_to_inactive_per_sec = per_minute_to_per_second(require_non_negative(
            "active_to_inactive_per_min",
            mutant.active_to_inactive_per_min,
        )?);
        let substrate_off_per_sec = per_minute_to_per_second(require_non_negative(
            "substrate_off_per_min",
            mutant.substrate_off_per_min,
        )?);
        let inhibitor_off_per_sec = per_minute_to_per_second(require_non_negative(
            "inhibitor_off_per_min",
            binding.inhibitor_off_per_min,
        )?);

        let km_M = mutant.km_uM * 1e-6;
        let ic50_M = binding.ic50_nM * 1e-9;

        let delta_g = self.wild_type_delta_g_kcal_per_mol
            + mutant.delta_g_kcal_per_mol
            + bound.shift_kcal_per_mol(mutant.delta_g_error_kcal_per_mol);
        let f = positive_denominator("boltzmann_factor", self.boltzmann_factor(delta_g))?;
        let f_inv = positive_denominator("inverse_boltzmann_factor", 1.0 / f)?;

        let one_plus_s_over_km = 1.0 + self.substrate_M / km_M;
        let dissociation_constant_M = match drug.mechanism {
            Mechanism::InactiveConformation => ic50_M / (1.0 + f * one_plus_s_over_km),
            Mechanism::ActiveConformation => ic50_M * f_inv / (1.0 + f_inv * one_plus_s_over_km),
        };
        let dissociation_constant_M =
            positive_denominator("dissociation_constant_M", dissociation_constant_M)?;

        let rates = RateConstants {
            catalysis_per_sec,
            active_to_inactive_per_sec,
            inactive_to_active_per_sec: active_to_inactive_per_sec * f,
            substrate_on_per_M_per_sec: (substrate_off_per_sec + catalysis_per_sec) / km_M,
            substrate_off_per_sec,
            inhibitor_on_per_M_per_sec: inhibitor_off_per_sec / dissociation_constant_M,
            inhibitor_off_per_sec,
            substrate_M: self.substrate_M,
        };

        let initial_state = self.equilibrium_state(f, km_M)?;

        log::debug!(
            "{} / {}: f={:.4e}, RD={:.4e} M, kon(I)={:.4e} /M/s, kon(S)={:.4e} /M/s",
            mutant.name,
            drug.name,
            f,
            dissociation_constant_M,
            rates.inhibitor_on_per_M_per_sec,
            rates.substrate_on_per_M_per_sec
        );

        Ok(ResolvedParameters {
            rates,
            initial_state,
            boltzmann_factor: f,
            dissociation_constant_M,
            mechanism: drug.mechanism,
        })
    }

    /// Zero-inhibitor equilibrium: weights {1, f, f·[S]/KM} for
    /// {inactive-unbound, active-unbound, substrate-bound}, scaled to the enzyme total
    pub fn equilibrium_state(&self, boltzmann_factor: f64, km_M: f64) -> Result<EnzymeStateVector> {
        let weight_inactive = 1.0;
        let weight_active = boltzmann_factor;
        let weight_bound = boltzmann_factor * self.substrate_M / km_M;
        let weight_total = positive_denominator(
            "equilibrium_weight_total",
            weight_inactive + weight_active + weight_bound,
        )?;

        Ok(EnzymeStateVector {
            active_unbound_M: self.enzyme_total_M * weight_active / weight_total,
            substrate_bound_M: self.enzyme_total_M * weight_bound / weight_total,
            inactive_unbound_M: self.enzyme_total_M * weight_inactive / weight_total,
            inhibited_M: 0.0,
        })
    }
}

/// Convert a per-minute rate to per-second
#[inline]
pub fn per_minute_to_per_second(rate_per_min: f64) -> f64 {
    rate_per_min / 60.0
}

fn positive_denominator(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositiveDenominator { name, value })
    }
}
