//! Kinase Resistance Sim - BCR-ABL occupancy under tyrosine kinase inhibitor dosing
//!
//! This library couples a four-state enzyme kinetic model with a one-compartment
//! oral-dosing pharmacokinetic profile to predict how kinase activity of
//! resistant mutants evolves over days of treatment.

// Allow non-snake-case for unit suffixes in field names (M, nM, uM, K, etc.)
// This follows the project convention of including units in names.
#![allow(non_snake_case)]

pub mod config;
pub mod error;
pub mod export;
pub mod kinetics;
pub mod pharmacokinetics;
pub mod simulation;

pub use config::{DrugBinding, DrugRecord, Mechanism, MutantRecord, ParameterTable, SimulationParameters};
pub use error::{ConfigError, Result};
pub use kinetics::{
    mechanism_for, DeltaGBound, EnzymeStateVector, ExitRates, InhibitionMechanism,
    KineticStateEngine, ParameterResolver, RateConstants, ResolvedParameters,
};
pub use pharmacokinetics::{ConcentrationDriver, PharmacokineticProfile, SECONDS_PER_DAY};
pub use simulation::{
    collect_run, RunLabel, RunOrchestrator, RunOutcome, RunRequest, RunResult, RunSummary, Sampler,
    SimulationRun, StabilityCheck, StabilityMonitor, SummaryBuilder, TimeSeriesRecord,
};
