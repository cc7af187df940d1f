//! Run orchestration: step loop, conservation monitoring and sampling.
//!
//! Each run is strictly sequential and owns all of its state, so runs for
//! different (drug, mutant) pairs execute in parallel without coordination.
//!
//! ## Per-step flow
//! 1. Concentration driver evaluated at the current elapsed time
//! 2. Engine step with rates frozen at that concentration
//! 3. Stability monitor check on summed occupancy
//! 4. Sampler emits a record once per sample interval
//!
//! ## Usage
//! ```ignore
//! let orchestrator = RunOrchestrator::new(ParameterTable::default(), SimulationParameters::default())?;
//! let run = orchestrator.start(&RunRequest::new("Imatinib", "T315I"))?;
//! for record in run {
//!     sink.write_record(&record)?;
//! }
//! ```

mod monitor;
mod orchestrator;
mod run;
mod sampler;
mod summary;

pub use monitor::{StabilityCheck, StabilityMonitor};
pub use orchestrator::{collect_run, RunOrchestrator, RunRequest, RunResult};
pub use run::{RunLabel, RunOutcome, SimulationRun};
pub use sampler::{Sampler, TimeSeriesRecord};
pub use summary::{RunSummary, SummaryBuilder};
