//! CSV time-series export for run records.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::simulation::{RunLabel, TimeSeriesRecord};

/// File name used for a run, e.g. `timeseries_imatinib_t315i_nominal.csv`
pub fn csv_file_name(label: &RunLabel) -> String {
    let slug = |s: &str| s.to_lowercase().replace([' ', '-'], "_");
    format!(
        "timeseries_{}_{}_{}.csv",
        slug(&label.drug),
        slug(&label.mutant),
        label.delta_g_bound.as_str()
    )
}

/// CSV exporter for one run's records
pub struct CsvExporter {
    writer: csv::Writer<File>,
    /// Path to output file
    path: PathBuf,
}

impl CsvExporter {
    /// Create `dir/<csv_file_name(label)>`
    ///
    /// Creates the directory if it doesn't exist. The header row is written
    /// with the first record.
    pub fn new(dir: &Path, label: &RunLabel) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(csv_file_name(label));
        let file = File::create(&path)?;
        let writer = csv::Writer::from_writer(file);

        log::info!("CSV export started: {}", path.display());

        Ok(Self { writer, path })
    }

    /// Record one sample
    pub fn record(&mut self, record: &TimeSeriesRecord) -> Result<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!("CSV export completed: {}", self.path.display());
        Ok(self.path)
    }

    /// Get the output path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
