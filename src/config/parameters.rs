//! Global run settings shared by every (drug, mutant) run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{require_positive, Result};

/// Default location of the run settings file
pub const DEFAULT_PARAMETERS_PATH: &str = "data/parameters/simulation.json";

/// Settings common to all runs of one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Temperature (K)
    /// Reference: 37°C body temperature
    pub temperature_K: f64,

    /// Free substrate (ATP) concentration, held constant (M)
    pub substrate_M: f64,

    /// Total enzyme concentration (M)
    pub enzyme_total_M: f64,

    /// Wild-type active/inactive conformational free energy (kcal/mol)
    /// Negative values favour the active conformation.
    pub wild_type_delta_g_kcal_per_mol: f64,

    /// Treatment horizon (days)
    pub duration_days: f64,

    /// Integration timestep (s)
    /// Must stay well below the fastest characteristic time of the kinetic scheme.
    pub dt_sec: f64,

    /// Simulated time between emitted records (s)
    pub sample_interval_sec: f64,

    /// Relative drift of summed occupancy from the enzyme total that ends a run.
    /// A tunable safety margin for the first-order scheme, not an accuracy bound.
    pub drift_tolerance: f64,
}

impl SimulationParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(params) => {
                    log::info!("Loaded simulation parameters from {:?}", path.as_ref());
                    params
                }
                Err(e) => {
                    log::warn!("Failed to parse simulation parameters: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Simulation parameters file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Horizon in seconds
    pub fn duration_sec(&self) -> f64 {
        self.duration_days * 24.0 * 3600.0
    }

    /// Check that every setting is usable before a run is built
    pub fn validate(&self) -> Result<()> {
        require_positive("temperature_K", self.temperature_K)?;
        require_positive("substrate_M", self.substrate_M)?;
        require_positive("enzyme_total_M", self.enzyme_total_M)?;
        require_positive("duration_days", self.duration_days)?;
        require_positive("dt_sec", self.dt_sec)?;
        require_positive("sample_interval_sec", self.sample_interval_sec)?;
        require_positive("drift_tolerance", self.drift_tolerance)?;
        if !self.wild_type_delta_g_kcal_per_mol.is_finite() {
            return Err(crate::ConfigError::InvalidParameter {
                name: "wild_type_delta_g_kcal_per_mol",
                value: self.wild_type_delta_g_kcal_per_mol,
            });
        }
        Ok(())
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            temperature_K: 310.0,
            substrate_M: 10e-6,
            enzyme_total_M: 1e-6,
            wild_type_delta_g_kcal_per_mol: -1.0,
            duration_days: 10.0,
            // ~1/100 s or finer keeps every rate*dt well below 1
            dt_sec: 0.001,
            sample_interval_sec: 60.0,
            drift_tolerance: 0.01,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = SimulationParameters::default();
        assert!((params.temperature_K - 310.0).abs() < 1e-9);
        assert!((params.duration_sec() - 864_000.0).abs() < 1e-6);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timestep() {
        let params = SimulationParameters {
            dt_sec: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: SimulationParameters =
            serde_json::from_str(r#"{ "duration_days": 2.0, "dt_sec": 0.01 }"#).unwrap();
        assert!((parsed.duration_days - 2.0).abs() < 1e-12);
        assert!((parsed.substrate_M - 10e-6).abs() < 1e-18);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let params = SimulationParameters::load_or_default("does/not/exist.json");
        assert_eq!(params, SimulationParameters::default());
    }
}
