//! Builds and runs independent (drug, mutant) simulations.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::run::{RunLabel, RunOutcome, SimulationRun};
use super::sampler::TimeSeriesRecord;
use super::summary::{RunSummary, SummaryBuilder};
use crate::config::{ParameterTable, SimulationParameters};
use crate::error::Result;
use crate::kinetics::{DeltaGBound, KineticStateEngine, ParameterResolver};
use crate::pharmacokinetics::{ConcentrationDriver, PharmacokineticProfile};

/// One requested (drug, mutant) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Drug name
    pub drug: String,
    /// Mutant name
    pub mutant: String,
    /// Free-energy bound
    #[serde(default)]
    pub delta_g_bound: DeltaGBound,
}

impl RunRequest {
    /// Request at the nominal free-energy offset
    pub fn new(drug: impl Into<String>, mutant: impl Into<String>) -> Self {
        Self {
            drug: drug.into(),
            mutant: mutant.into(),
            delta_g_bound: DeltaGBound::Nominal,
        }
    }

    /// Same pair at another free-energy bound
    pub fn with_bound(mut self, bound: DeltaGBound) -> Self {
        self.delta_g_bound = bound;
        self
    }
}

/// Fully collected output of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Run identity
    pub label: RunLabel,
    /// Sampled records in time order
    pub records: Vec<TimeSeriesRecord>,
    /// Why the run ended
    pub outcome: RunOutcome,
    /// Condensed statistics
    pub summary: RunSummary,
}

/// Wires parameter resolution, concentration driver and engine for each request
#[derive(Debug, Clone)]
pub struct RunOrchestrator {
    table: ParameterTable,
    params: SimulationParameters,
    resolver: ParameterResolver,
}

impl RunOrchestrator {
    /// Create an orchestrator over a parameter table
    pub fn new(table: ParameterTable, params: SimulationParameters) -> Result<Self> {
        let resolver = ParameterResolver::new(&params)?;
        Ok(Self {
            table,
            params,
            resolver,
        })
    }

    /// Parameter table
    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    /// Run settings
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Every (drug, mutant) pair, drug-major
    pub fn cross_requests<D, M>(drugs: &[D], mutants: &[M], bound: DeltaGBound) -> Vec<RunRequest>
    where
        D: AsRef<str>,
        M: AsRef<str>,
    {
        drugs
            .iter()
            .flat_map(|drug| {
                mutants.iter().map(move |mutant| {
                    RunRequest::new(drug.as_ref(), mutant.as_ref()).with_bound(bound)
                })
            })
            .collect()
    }

    /// Resolve parameters and build a lazy run; no step is taken yet
    ///
    /// # Errors
    /// Any [`crate::ConfigError`] from table lookup, parameter resolution or
    /// the concentration driver.
    pub fn start(&self, request: &RunRequest) -> Result<SimulationRun> {
        let (drug_index, drug) = self.table.drug(&request.drug)?;
        let (mutant_index, mutant) = self.table.mutant(&request.mutant)?;

        let resolved = self.resolver.resolve(mutant, drug, request.delta_g_bound)?;
        let driver = ConcentrationDriver::new(PharmacokineticProfile::from(drug))?;

        log::info!(
            "{} / {} ({:?}): steady-state mean {:.1} nM (reported {:.1} nM)",
            drug.name,
            mutant.name,
            request.delta_g_bound,
            driver.steady_state_mean_M() * 1e9,
            drug.reference_average_nM
        );

        let label = RunLabel {
            drug: drug.name.clone(),
            mutant: mutant.name.clone(),
            drug_index,
            mutant_index,
            mechanism: resolved.mechanism,
            delta_g_bound: request.delta_g_bound,
        };
        let engine =
            KineticStateEngine::new(resolved.initial_state, resolved.rates, resolved.mechanism);
        let run = SimulationRun::new(label, engine, driver, &self.params);

        let stiffness = run.stiffness_at_mean();
        if stiffness >= 1.0 {
            log::warn!(
                "{} / {}: rate·dt = {:.3} at the mean concentration ({}), expect truncation",
                drug.name,
                mutant.name,
                stiffness,
                run.mechanism_name()
            );
        } else {
            log::debug!(
                "{} / {}: rate·dt = {:.3e} at the mean concentration ({})",
                drug.name,
                mutant.name,
                stiffness,
                run.mechanism_name()
            );
        }

        Ok(run)
    }

    /// Run one request to completion and collect its records
    pub fn run(&self, request: &RunRequest) -> Result<RunResult> {
        let mut run = self.start(request)?;
        Ok(collect_run(&mut run, self.params.enzyme_total_M))
    }

    /// Run all requests in parallel; results keep request order
    pub fn run_all(&self, requests: &[RunRequest]) -> Vec<Result<RunResult>> {
        requests.par_iter().map(|request| self.run(request)).collect()
    }
}

/// Drain a run into a [`RunResult`]
pub fn collect_run(run: &mut SimulationRun, enzyme_total_M: f64) -> RunResult {
    let mut summary = SummaryBuilder::new(run.label().clone(), enzyme_total_M);
    let records: Vec<TimeSeriesRecord> = run.by_ref().inspect(|r| summary.observe(r)).collect();
    let outcome = run.outcome();
    RunResult {
        label: run.label().clone(),
        records,
        outcome,
        summary: summary.finish(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_requests_drug_major() {
        let requests = RunOrchestrator::cross_requests(
            &["Imatinib", "Dasatinib"],
            &["Wild type", "T315I"],
            DeltaGBound::Nominal,
        );
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0], RunRequest::new("Imatinib", "Wild type"));
        assert_eq!(requests[1], RunRequest::new("Imatinib", "T315I"));
        assert_eq!(requests[2].drug, "Dasatinib");
    }

    #[test]
    fn test_start_unknown_drug() {
        let orchestrator =
            RunOrchestrator::new(ParameterTable::default(), SimulationParameters::default()).unwrap();
        assert!(orchestrator.start(&RunRequest::new("Nilotinib", "T315I")).is_err());
    }

    #[test]
    fn test_start_takes_no_step() {
        let orchestrator =
            RunOrchestrator::new(ParameterTable::default(), SimulationParameters::default()).unwrap();
        let run = orchestrator.start(&RunRequest::new("Ponatinib", "T315I")).unwrap();
        assert_eq!(run.elapsed_sec(), 0.0);
        assert_eq!(run.outcome(), RunOutcome::Running);
        assert_eq!(run.label().mutant_index, 5);
        assert_eq!(run.total_steps(), 864_000_000);
        assert_eq!(run.mechanism_name(), "inactive_conformation");
    }

    #[test]
    fn test_stiffness_flags_unstable_mutant() {
        let orchestrator =
            RunOrchestrator::new(ParameterTable::default(), SimulationParameters::default()).unwrap();
        let stable = orchestrator.start(&RunRequest::new("Dasatinib", "T315I")).unwrap();
        assert!(stable.stiffness_at_mean() < 1.0);
        assert_eq!(stable.mechanism_name(), "active_conformation");

        // Y253H: inactive→active rate far above 1/dt
        let unstable = orchestrator.start(&RunRequest::new("Imatinib", "Y253H")).unwrap();
        assert!(unstable.stiffness_at_mean() > 1.0);
    }
}
