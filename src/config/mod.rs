//! Configuration module for loading simulation parameters and measured data.
//!
//! Measured kinetic and pharmacokinetic constants carry citations to their
//! source publications.

mod lookup_table;
mod parameters;

pub use lookup_table::{DrugBinding, DrugRecord, Mechanism, MutantRecord, ParameterTable};
pub use parameters::{SimulationParameters, DEFAULT_PARAMETERS_PATH};
