//! Closed-form concentration driver.

use serde::{Deserialize, Serialize};

use crate::config::DrugRecord;
use crate::error::{require_positive, ConfigError, Result};

/// Hours between doses
pub const HOURS_PER_DAY: f64 = 24.0;

/// Seconds between doses
pub const SECONDS_PER_DAY: f64 = HOURS_PER_DAY * 3600.0;

/// Oral dosing constants for one drug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacokineticProfile {
    /// Drug name
    pub drug: String,
    /// Bioavailability (fraction)
    pub bioavailability: f64,
    /// Daily dose (mol)
    pub dose_mol: f64,
    /// Volume of distribution (L)
    pub volume_of_distribution_L: f64,
    /// Elimination rate (/h)
    pub elimination_per_hour: f64,
    /// Absorption rate (/h)
    pub absorption_per_hour: f64,
    /// First day index evaluated with the steady-state closed form
    pub switch_day: u32,
}

impl From<&DrugRecord> for PharmacokineticProfile {
    fn from(drug: &DrugRecord) -> Self {
        Self {
            drug: drug.name.clone(),
            bioavailability: drug.bioavailability,
            dose_mol: drug.dose_mol,
            volume_of_distribution_L: drug.volume_of_distribution_L,
            elimination_per_hour: drug.elimination_per_hour,
            absorption_per_hour: drug.absorption_per_hour,
            switch_day: drug.switch_day,
        }
    }
}

/// Maps elapsed time since the first dose to plasma concentration.
///
/// Stateless after construction; every call depends only on its argument.
#[derive(Debug, Clone)]
pub struct ConcentrationDriver {
    profile: PharmacokineticProfile,
    /// γ = F·D·ka / (V·(ka - ke)) (M)
    gamma_M: f64,
    /// Per-day elimination factor e^(24·ke)
    epsilon: f64,
    /// Per-day absorption factor e^(24·ka)
    alpha: f64,
}

impl ConcentrationDriver {
    /// Build a driver from a dosing profile
    ///
    /// # Errors
    /// [`ConfigError::DegenerateAbsorption`] when ka equals ke (γ undefined),
    /// [`ConfigError::InvalidParameter`] for non-positive dosing constants.
    pub fn new(profile: PharmacokineticProfile) -> Result<Self> {
        require_positive("bioavailability", profile.bioavailability)?;
        require_positive("dose_mol", profile.dose_mol)?;
        require_positive("volume_of_distribution_L", profile.volume_of_distribution_L)?;
        let ke = require_positive("elimination_per_hour", profile.elimination_per_hour)?;
        let ka = require_positive("absorption_per_hour", profile.absorption_per_hour)?;
        if ka == ke {
            return Err(ConfigError::DegenerateAbsorption {
                drug: profile.drug.clone(),
                rate_per_hour: ka,
            });
        }

        let gamma_M = profile.bioavailability * profile.dose_mol * ka
            / (profile.volume_of_distribution_L * (ka - ke));
        let epsilon = (ke * HOURS_PER_DAY).exp();
        let alpha = (ka * HOURS_PER_DAY).exp();
        if !(gamma_M.is_finite() && epsilon.is_finite() && alpha.is_finite()) {
            return Err(ConfigError::NonPositiveDenominator {
                name: "pharmacokinetic_constants",
                value: gamma_M,
            });
        }

        Ok(Self {
            profile,
            gamma_M,
            epsilon,
            alpha,
        })
    }

    /// Inhibitor concentration at `elapsed_sec` after the first dose (M)
    pub fn concentration_M(&self, elapsed_sec: f64) -> f64 {
        let elapsed_sec = elapsed_sec.max(0.0);
        let day = (elapsed_sec / SECONDS_PER_DAY).floor();
        let hours_into_day = (elapsed_sec - day * SECONDS_PER_DAY) / 3600.0;
        let day = day as u32;

        if day < self.profile.switch_day {
            self.accumulation_concentration_M(day, hours_into_day)
        } else {
            self.steady_state_concentration_M(hours_into_day)
        }
    }

    /// Superposition of the doses given on days `0..=day`, evaluated
    /// `hours_into_day` after the latest one (M)
    pub fn accumulation_concentration_M(&self, day: u32, hours_into_day: f64) -> f64 {
        let elimination_sum = geometric_sum(self.epsilon.recip(), day);
        let absorption_sum = geometric_sum(self.alpha.recip(), day);
        self.gamma_M
            * (elimination_sum * (-self.profile.elimination_per_hour * hours_into_day).exp()
                - absorption_sum * (-self.profile.absorption_per_hour * hours_into_day).exp())
    }

    /// Limit of infinitely many prior daily doses, evaluated
    /// `hours_into_day` after the latest one (M)
    pub fn steady_state_concentration_M(&self, hours_into_day: f64) -> f64 {
        let e = self.epsilon;
        let a = self.alpha;
        self.gamma_M
            * (e / (e - 1.0) * (-self.profile.elimination_per_hour * hours_into_day).exp()
                - a / (a - 1.0) * (-self.profile.absorption_per_hour * hours_into_day).exp())
    }

    /// Mean steady-state concentration over one dosing interval, F·D / (V·ke·24 h) (M)
    pub fn steady_state_mean_M(&self) -> f64 {
        let p = &self.profile;
        p.bioavailability * p.dose_mol
            / (p.volume_of_distribution_L * p.elimination_per_hour * HOURS_PER_DAY)
    }

    /// Dosing profile
    pub fn profile(&self) -> &PharmacokineticProfile {
        &self.profile
    }

    /// γ (M)
    pub fn gamma_M(&self) -> f64 {
        self.gamma_M
    }

    /// Per-day elimination factor
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Per-day absorption factor
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Σ_{j=0..=n} r^j, accumulated term by term
fn geometric_sum(ratio: f64, n: u32) -> f64 {
    let mut sum = 0.0;
    let mut term = 1.0;
    for _ in 0..=n {
        sum += term;
        term *= ratio;
    }
    sum
}
