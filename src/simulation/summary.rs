//! Per-run condensation of a record series for resistance comparison.

use serde::{Deserialize, Serialize};

use super::run::{RunLabel, RunOutcome};
use super::sampler::TimeSeriesRecord;
use crate::pharmacokinetics::SECONDS_PER_DAY;

/// Condensed view of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run identity
    pub label: RunLabel,
    /// Number of records
    pub samples: usize,
    /// Elapsed time of the last record (days)
    pub final_elapsed_days: f64,
    /// Mean product rate over all records (M/s)
    pub mean_product_rate_M_per_sec: f64,
    /// Minimum product rate over all records (M/s)
    pub min_product_rate_M_per_sec: f64,
    /// Substrate-bound fraction of the enzyme total at the last record
    pub final_substrate_bound_fraction: f64,
    /// Inhibited fraction of the enzyme total at the last record
    pub final_inhibited_fraction: f64,
    /// Highest sampled inhibitor concentration (nM)
    pub peak_concentration_nM: f64,
    /// Day at which the stability monitor stopped the run
    pub truncated_at_days: Option<f64>,
}

/// Builds a [`RunSummary`] one record at a time
#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    label: RunLabel,
    enzyme_total_M: f64,
    samples: usize,
    product_rate_sum: f64,
    min_product_rate: f64,
    peak_concentration_nM: f64,
    last: Option<TimeSeriesRecord>,
}

impl SummaryBuilder {
    /// Start an empty summary
    pub fn new(label: RunLabel, enzyme_total_M: f64) -> Self {
        Self {
            label,
            enzyme_total_M,
            samples: 0,
            product_rate_sum: 0.0,
            min_product_rate: f64::INFINITY,
            peak_concentration_nM: 0.0,
            last: None,
        }
    }

    /// Fold in one record
    pub fn observe(&mut self, record: &TimeSeriesRecord) {
        self.samples += 1;
        self.product_rate_sum += record.product_rate_M_per_sec;
        self.min_product_rate = self.min_product_rate.min(record.product_rate_M_per_sec);
        self.peak_concentration_nM = self.peak_concentration_nM.max(record.concentration_nM);
        self.last = Some(*record);
    }

    /// Close the summary with the run outcome
    pub fn finish(self, outcome: RunOutcome) -> RunSummary {
        let (final_elapsed_days, bound, inhibited) = match self.last {
            Some(r) => (r.elapsed_days, r.substrate_bound_M, r.inhibited_M),
            None => (0.0, 0.0, 0.0),
        };
        let (mean, min) = if self.samples > 0 {
            (self.product_rate_sum / self.samples as f64, self.min_product_rate)
        } else {
            (0.0, 0.0)
        };
        let truncated_at_days = match outcome {
            RunOutcome::Truncated { at_sec, .. } => Some(at_sec / SECONDS_PER_DAY),
            _ => None,
        };

        RunSummary {
            label: self.label,
            samples: self.samples,
            final_elapsed_days,
            mean_product_rate_M_per_sec: mean,
            min_product_rate_M_per_sec: min,
            final_substrate_bound_fraction: bound / self.enzyme_total_M,
            final_inhibited_fraction: inhibited / self.enzyme_total_M,
            peak_concentration_nM: self.peak_concentration_nM,
            truncated_at_days,
        }
    }
}
