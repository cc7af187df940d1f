//! JSON export of run summaries.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::config::SimulationParameters;
use crate::simulation::RunSummary;

/// Full summary export structure
#[derive(Debug, Clone, Serialize)]
pub struct SummaryExport<'a> {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: &'static str,
    /// Run settings shared by all summaries
    pub parameters: &'a SimulationParameters,
    /// One entry per run
    pub runs: &'a [RunSummary],
}

/// Export run summaries to `dir/summary_YYYYMMDD_HHMMSS.json`
///
/// Creates the directory if it doesn't exist. Returns the path written.
pub fn export_summaries_json(
    dir: &Path,
    parameters: &SimulationParameters,
    runs: &[RunSummary],
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let timestamp = Local::now();
    let filename = format!("summary_{}.json", timestamp.format("%Y%m%d_%H%M%S"));
    let path = dir.join(&filename);

    export_summaries_json_to(&path, parameters, runs)?;
    Ok(path)
}

/// Export run summaries to a specific file
pub fn export_summaries_json_to(
    path: &Path,
    parameters: &SimulationParameters,
    runs: &[RunSummary],
) -> Result<()> {
    let export = SummaryExport {
        exported_at: Local::now().to_rfc3339(),
        version: "1.0.0",
        parameters,
        runs,
    };

    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &export)?;

    log::info!("JSON summary exported: {}", path.display());
    Ok(())
}
