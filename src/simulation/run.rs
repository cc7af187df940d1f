//! One (drug, mutant) integration as a lazy record stream.

use serde::{Deserialize, Serialize};

use super::monitor::{StabilityCheck, StabilityMonitor};
use super::sampler::{Sampler, TimeSeriesRecord};
use crate::config::{Mechanism, SimulationParameters};
use crate::kinetics::{DeltaGBound, EnzymeStateVector, KineticStateEngine, RateConstants};
use crate::pharmacokinetics::{ConcentrationDriver, SECONDS_PER_DAY};

/// Identity of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLabel {
    /// Drug name
    pub drug: String,
    /// Mutant name
    pub mutant: String,
    /// Position of the drug in the parameter table
    pub drug_index: usize,
    /// Position of the mutant in the parameter table
    pub mutant_index: usize,
    /// Drug mechanism
    pub mechanism: Mechanism,
    /// Free-energy bound used
    pub delta_g_bound: DeltaGBound,
}

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Still producing records
    Running,
    /// Reached the configured horizon
    Completed,
    /// Stopped early by the stability monitor
    Truncated {
        /// Elapsed time of the diverged step (s)
        at_sec: f64,
        /// Summed occupancy at that step (M)
        total_M: f64,
    },
}

impl RunOutcome {
    /// True when the monitor ended the run early
    pub fn is_truncated(&self) -> bool {
        matches!(self, RunOutcome::Truncated { .. })
    }
}

/// A single integration: engine, driver, monitor and sampler wired together.
///
/// Iterating yields the sampled records in time order. The sequence is
/// forward-only; once it returns `None` the run is finished and
/// [`SimulationRun::outcome`] reports why.
#[derive(Debug)]
pub struct SimulationRun {
    label: RunLabel,
    engine: KineticStateEngine,
    driver: ConcentrationDriver,
    monitor: StabilityMonitor,
    sampler: Sampler,
    dt_sec: f64,
    total_steps: u64,
    step: u64,
    outcome: RunOutcome,
}

impl SimulationRun {
    /// Wire a run from its parts
    pub fn new(
        label: RunLabel,
        engine: KineticStateEngine,
        driver: ConcentrationDriver,
        params: &SimulationParameters,
    ) -> Self {
        let total_steps = (params.duration_sec() / params.dt_sec).round() as u64;
        Self {
            label,
            engine,
            driver,
            monitor: StabilityMonitor::new(params.enzyme_total_M, params.drift_tolerance),
            sampler: Sampler::new(params.sample_interval_sec),
            dt_sec: params.dt_sec,
            total_steps,
            step: 0,
            outcome: RunOutcome::Running,
        }
    }

    /// Run identity
    pub fn label(&self) -> &RunLabel {
        &self.label
    }

    /// Current outcome; [`RunOutcome::Running`] until the iterator is exhausted
    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    /// Current occupancy
    pub fn state(&self) -> &EnzymeStateVector {
        self.engine.state()
    }

    /// Rate constants of this run
    pub fn rates(&self) -> &RateConstants {
        self.engine.rates()
    }

    /// Concentration driver of this run
    pub fn driver(&self) -> &ConcentrationDriver {
        &self.driver
    }

    /// Simulated time reached (s)
    pub fn elapsed_sec(&self) -> f64 {
        self.step as f64 * self.dt_sec
    }

    /// Number of steps to the horizon
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Largest rate·dt at the steady-state mean concentration
    ///
    /// Runs at or above 1 are expected to truncate.
    pub fn stiffness_at_mean(&self) -> f64 {
        self.engine
            .stiffness(self.dt_sec, self.driver.steady_state_mean_M())
    }

    /// Name of the inhibition strategy driving the engine
    pub fn mechanism_name(&self) -> &'static str {
        self.engine.mechanism_name()
    }

    fn finish(&mut self, outcome: RunOutcome) {
        self.outcome = outcome;
        match outcome {
            RunOutcome::Truncated { at_sec, total_M } => log::warn!(
                "{} / {}: unstable step (total {:.4e} M), truncated at day {:.4}",
                self.label.drug,
                self.label.mutant,
                total_M,
                at_sec / SECONDS_PER_DAY
            ),
            _ => log::info!(
                "{} / {}: completed {} steps",
                self.label.drug,
                self.label.mutant,
                self.step
            ),
        }
    }
}

impl Iterator for SimulationRun {
    type Item = TimeSeriesRecord;

    fn next(&mut self) -> Option<TimeSeriesRecord> {
        if self.outcome != RunOutcome::Running {
            return None;
        }

        while self.step < self.total_steps {
            let inhibitor_M = self.driver.concentration_M(self.elapsed_sec());
            let state = self.engine.step(self.dt_sec, inhibitor_M);
            self.step += 1;
            let elapsed_sec = self.elapsed_sec();

            if let StabilityCheck::Diverged { total_M } = self.monitor.check(&state) {
                self.finish(RunOutcome::Truncated {
                    at_sec: elapsed_sec,
                    total_M,
                });
                return None;
            }

            if self.sampler.advance(self.dt_sec) {
                return Some(TimeSeriesRecord::new(
                    elapsed_sec,
                    self.driver.concentration_M(elapsed_sec),
                    &state,
                    self.engine.rates().catalysis_per_sec,
                ));
            }
        }

        self.finish(RunOutcome::Completed);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParameterTable, SimulationParameters};
    use crate::kinetics::ParameterResolver;
    use crate::pharmacokinetics::PharmacokineticProfile;

    fn imatinib_run(params: &SimulationParameters) -> SimulationRun {
        let table = ParameterTable::default();
        let (drug_index, drug) = table.drug("Imatinib").unwrap();
        let (mutant_index, mutant) = table.mutant("E255K").unwrap();
        let resolved = ParameterResolver::new(params)
            .unwrap()
            .resolve(mutant, drug, DeltaGBound::Nominal)
            .unwrap();
        let label = RunLabel {
            drug: drug.name.clone(),
            mutant: mutant.name.clone(),
            drug_index,
            mutant_index,
            mechanism: resolved.mechanism,
            delta_g_bound: DeltaGBound::Nominal,
        };
        let engine =
            KineticStateEngine::new(resolved.initial_state, resolved.rates, resolved.mechanism);
        let driver = ConcentrationDriver::new(PharmacokineticProfile::from(drug)).unwrap();
        SimulationRun::new(label, engine, driver, params)
    }

    #[test]
    fn test_horizon_step_count() {
        let params = SimulationParameters {
            duration_days: 0.5,
            dt_sec: 0.01,
            ..Default::default()
        };
        assert_eq!(imatinib_run(&params).total_steps(), 4_320_000);
    }

    #[test]
    fn test_completes_at_horizon() {
        let params = SimulationParameters {
            duration_days: 150.0 / SECONDS_PER_DAY,
            dt_sec: 0.01,
            ..Default::default()
        };
        let mut run = imatinib_run(&params);
        let records: Vec<_> = run.by_ref().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(run.outcome(), RunOutcome::Completed);
        assert!((run.elapsed_sec() - 150.0).abs() < 1e-9);
        assert!(run.next().is_none());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&RunOutcome::Truncated {
            at_sec: 2.0,
            total_M: 1.5e-6,
        })
        .unwrap();
        assert!(json.contains("\"status\":\"truncated\""));
        assert!(RunOutcome::Truncated { at_sec: 0.0, total_M: 0.0 }.is_truncated());
        assert!(!RunOutcome::Completed.is_truncated());
    }
}
