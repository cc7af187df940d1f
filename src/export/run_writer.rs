//! Streams runs straight from the orchestrator into their output files.

use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::{CsvExporter, DatWriter};
use crate::simulation::{RunOrchestrator, RunRequest, RunSummary, SummaryBuilder};

/// Run one request, writing its `.dat` file (and CSV when `csv` is set)
/// record by record.
///
/// Nothing is written when the request fails to resolve.
pub fn write_run(
    orchestrator: &RunOrchestrator,
    request: &RunRequest,
    out_dir: &Path,
    csv: bool,
) -> Result<RunSummary> {
    let mut run = orchestrator.start(request)?;
    let label = run.label().clone();

    let (mut dat, _) = DatWriter::create(out_dir, &label)?;
    let mut csv_exporter = if csv {
        Some(CsvExporter::new(out_dir, &label)?)
    } else {
        None
    };
    let mut summary = SummaryBuilder::new(label, orchestrator.params().enzyme_total_M);

    for record in run.by_ref() {
        dat.write_record(&record)?;
        if let Some(exporter) = csv_exporter.as_mut() {
            exporter.record(&record)?;
        }
        summary.observe(&record);
    }

    dat.finish()?;
    if let Some(exporter) = csv_exporter {
        exporter.finish()?;
    }
    Ok(summary.finish(run.outcome()))
}

/// Write every request in parallel; one result per request, in request order.
///
/// A failed request does not stop the others. Each error names its drug and mutant.
pub fn write_runs(
    orchestrator: &RunOrchestrator,
    requests: &[RunRequest],
    out_dir: &Path,
    csv: bool,
) -> Vec<Result<RunSummary>> {
    requests
        .par_iter()
        .map(|request| {
            write_run(orchestrator, request, out_dir, csv)
                .with_context(|| format!("run {} / {}", request.drug, request.mutant))
        })
        .collect()
}
