//! Measured kinetic, thermodynamic and pharmacokinetic constants.
//!
//! The default table covers eleven BCR-ABL kinase domain variants and three
//! tyrosine kinase inhibitors.
//!
//! IC50 sources:
//! - Redaelli S et al. J Clin Oncol. 2009;27:469-471 (wild type, G250E, Y253H, E255K, E255V, T315I)
//! - Zabriskie MS et al. Cancer Cell. 2014;26:428-442 (T315M and compound mutants)
//!
//! Conformational free-energy offsets are positive when the mutation
//! stabilises the inactive conformation and negative when it stabilises
//! the active one.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Conformation the inhibitor binds, and therefore which transition it competes with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    /// Binds the inactive-unbound enzyme (type II, e.g. imatinib, ponatinib)
    InactiveConformation,
    /// Binds the active-unbound enzyme, competing with substrate (type I, e.g. dasatinib)
    ActiveConformation,
}

/// Inhibitor potency and dissociation for one mutant/drug pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugBinding {
    /// Drug name, matching [`DrugRecord::name`]
    pub drug: String,
    /// Half-maximal inhibitory concentration (nM)
    pub ic50_nM: f64,
    /// Inhibitor dissociation rate (/min)
    pub inhibitor_off_per_min: f64,
}

/// Measured constants for one enzyme variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutantRecord {
    /// Variant label (e.g. "T315I")
    pub name: String,
    /// Maximum velocity (pmol/min), informational
    pub vmax_pmol_per_min: f64,
    /// Turnover number (/min)
    pub kcat_per_min: f64,
    /// Michaelis constant (uM)
    pub km_uM: f64,
    /// Conformational free-energy offset relative to wild type (kcal/mol)
    pub delta_g_kcal_per_mol: f64,
    /// Maximum error on the free-energy offset (kcal/mol)
    pub delta_g_error_kcal_per_mol: f64,
    /// Active to inactive transition rate (/min)
    pub active_to_inactive_per_min: f64,
    /// Substrate dissociation rate (/min)
    pub substrate_off_per_min: f64,
    /// Per-drug potency
    pub bindings: Vec<DrugBinding>,
}

impl MutantRecord {
    /// Binding data for the named drug
    pub fn binding(&self, drug: &str) -> Result<&DrugBinding> {
        self.bindings
            .iter()
            .find(|b| b.drug == drug)
            .ok_or_else(|| ConfigError::MissingBinding {
                mutant: self.name.clone(),
                drug: drug.to_string(),
            })
    }
}

/// Oral dosing constants for one inhibitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Drug name
    pub name: String,
    /// Binding mechanism
    pub mechanism: Mechanism,
    /// Plasma half-life (h), informational
    pub half_life_hours: f64,
    /// Time to peak plasma concentration (h), informational
    pub peak_time_hours: f64,
    /// Reported average plasma concentration (nM)
    pub reference_average_nM: f64,
    /// Day index from which the steady-state closed form is used
    pub switch_day: u32,
    /// Oral bioavailability (fraction)
    pub bioavailability: f64,
    /// Daily dose (mol)
    pub dose_mol: f64,
    /// Volume of distribution (L)
    pub volume_of_distribution_L: f64,
    /// First-order elimination rate (/h)
    pub elimination_per_hour: f64,
    /// First-order absorption rate (/h)
    pub absorption_per_hour: f64,
}

/// Lookup table of measured constants, keyed by drug and mutant name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    /// Inhibitors
    pub drugs: Vec<DrugRecord>,
    /// Enzyme variants
    pub mutants: Vec<MutantRecord>,
}

impl ParameterTable {
    /// Load from JSON file or return the built-in table
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(table) => {
                    log::info!("Loaded parameter table from {:?}", path.as_ref());
                    table
                }
                Err(e) => {
                    log::warn!("Failed to parse parameter table: {}, using built-in table", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Parameter table file not found, using built-in table");
                Self::default()
            }
        }
    }

    /// Position and record of a drug
    pub fn drug(&self, name: &str) -> Result<(usize, &DrugRecord)> {
        self.drugs
            .iter()
            .enumerate()
            .find(|(_, d)| d.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownDrug(name.to_string()))
    }

    /// Position and record of a mutant
    pub fn mutant(&self, name: &str) -> Result<(usize, &MutantRecord)> {
        self.mutants
            .iter()
            .enumerate()
            .find(|(_, m)| m.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownMutant(name.to_string()))
    }

    /// Mutants simulated when none are requested explicitly
    pub fn default_mutant_names() -> Vec<&'static str> {
        vec!["Wild type", "G250E", "E255K", "E255V", "T315I", "T315M", "Y253H-E255V"]
    }
}

/// (name, Vmax, kcat, KM, dG, dG error, [IC50 ponatinib, imatinib, dasatinib])
type MutantRow = (&'static str, f64, f64, f64, f64, f64, [f64; 3]);

/// (active->inactive, substrate off, [inhibitor off ponatinib, imatinib, dasatinib]), all /min
type RateRow = (f64, f64, [f64; 3]);

const DRUG_NAMES: [&str; 3] = ["Ponatinib", "Imatinib", "Dasatinib"];

const MUTANT_ROWS: [MutantRow; 11] = [
    ("Wild type", 1.9, 66.0, 17.0, 0.0, 2.6, [2.1, 527.0, 1.8]),
    ("G250E", 5.1, 175.2, 14.3, -2.2, 3.3, [12.5, 3613.0, 8.1]),
    ("Y253H", 0.8, 26.9, 4.6, -24.0, 2.9, [29.8, 17700.0, 5.9]),
    ("E255K", 1.8, 63.6, 15.6, -0.5, 2.5, [17.6, 3174.0, 10.3]),
    ("E255V", 0.2, 6.8, 22.1, -0.4, 2.4, [27.2, 8953.0, 6.3]),
    ("T315I", 0.4, 12.2, 7.2, 0.1, 2.3, [6.3, 9221.0, 137.3]),
    ("T315M", 0.2, 8.1, 1.9, 0.1, 4.6, [577.5, 10240.0, 768.0]),
    ("G250E-T315I", 0.9, 30.0, 1.0, 19.1, 2.5, [152.4, 10240.0, 768.0]),
    ("Y253H-E255V", 0.4, 13.2, 0.7, 0.4, 2.5, [203.5, 10240.0, 18.1]),
    ("Y253H-T315I", 0.1, 3.8, 0.5, -29.3, 2.5, [357.9, 10240.0, 768.0]),
    ("E255V-T315I", 0.1, 4.1, 0.6, 23.7, 2.5, [659.5, 10240.0, 768.0]),
];

const RATE_ROWS: [RateRow; 11] = [
    (60.0, 33.0, [0.00488, 0.059, 0.00233]),
    (55.0, 350.0, [0.00488, 0.059, 0.01010]),
    (60.0, 75.0, [0.00488, 0.059, 1.0]),
    (60.0, 127.0, [0.00488, 0.059, 0.01310]),
    (60.0, 122.0, [0.00488, 0.059, 0.00861]),
    (60.0, 29.7, [0.00488, 0.059, 0.136]),
    (60.0, 16.2, [0.00488, 0.059, 0.354]),
    (60.0, 75.0, [0.00488, 0.059, 1.0]),
    (60.0, 26.4, [0.00488, 0.059, 0.00372]),
    (60.0, 75.0, [0.00488, 0.059, 1.0]),
    (60.0, 75.0, [0.00488, 0.059, 1.0]),
];

impl Default for ParameterTable {
    fn default() -> Self {
        let drugs = vec![
            DrugRecord {
                name: DRUG_NAMES[0].to_string(),
                mechanism: Mechanism::InactiveConformation,
                half_life_hours: 24.0,
                peak_time_hours: 6.0,
                reference_average_nM: 200.0,
                switch_day: 7,
                bioavailability: 1.0,
                dose_mol: 8.449e-5,
                volume_of_distribution_L: 1223.0,
                elimination_per_hour: 2.888e-2,
                absorption_per_hour: 1.302,
            },
            DrugRecord {
                name: DRUG_NAMES[1].to_string(),
                mechanism: Mechanism::InactiveConformation,
                half_life_hours: 18.0,
                peak_time_hours: 3.0,
                reference_average_nM: 2000.0,
                switch_day: 5,
                bioavailability: 1.0,
                dose_mol: 81.04e-5,
                volume_of_distribution_L: 435.0,
                elimination_per_hour: 3.851e-2,
                absorption_per_hour: 0.940,
            },
            DrugRecord {
                name: DRUG_NAMES[2].to_string(),
                mechanism: Mechanism::ActiveConformation,
                half_life_hours: 4.0,
                peak_time_hours: 1.0,
                reference_average_nM: 500.0,
                switch_day: 1,
                bioavailability: 1.0,
                dose_mol: 36.88e-5,
                volume_of_distribution_L: 2502.0,
                elimination_per_hour: 17.32e-2,
                absorption_per_hour: 1.740,
            },
        ];

        let mutants = MUTANT_ROWS
            .iter()
            .zip(RATE_ROWS.iter())
            .map(|(&(name, vmax, kcat, km, dg, dg_err, ic50s), &(k_trans, k_off_s, k_off_i))| {
                let bindings = DRUG_NAMES
                    .iter()
                    .enumerate()
                    .map(|(i, drug)| DrugBinding {
                        drug: drug.to_string(),
                        ic50_nM: ic50s[i],
                        inhibitor_off_per_min: k_off_i[i],
                    })
                    .collect();
                MutantRecord {
                    name: name.to_string(),
                    vmax_pmol_per_min: vmax,
                    kcat_per_min: kcat,
                    km_uM: km,
                    delta_g_kcal_per_mol: dg,
                    delta_g_error_kcal_per_mol: dg_err,
                    active_to_inactive_per_min: k_trans,
                    substrate_off_per_min: k_off_s,
                    bindings,
                }
            })
            .collect();

        Self { drugs, mutants }
    }
}
