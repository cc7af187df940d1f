//! Whitespace-delimited numeric record files.
//!
//! One line per record, columns:
//! `elapsed_days product_rate concentration_nM substrate_bound active_unbound inactive_unbound inhibited`
//! in C `%e` notation, separated by two spaces. The product rate is in M/min
//! (kcat per minute), the occupancies in M.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::simulation::{RunLabel, TimeSeriesRecord};

const SECONDS_PER_MINUTE: f64 = 60.0;

/// File name used for a run, e.g. `ProductRateDrug01Mutant05.dat`
pub fn dat_file_name(label: &RunLabel) -> String {
    format!(
        "ProductRateDrug{:02}Mutant{:02}.dat",
        label.drug_index, label.mutant_index
    )
}

/// Format a value like C's `%e`: six fractional digits, signed two-digit exponent
pub fn format_scientific(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }
    let formatted = format!("{:.6e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

/// Streams records to a `.dat` file
pub struct DatWriter<W: Write> {
    writer: W,
    records_written: usize,
}

impl DatWriter<BufWriter<File>> {
    /// Create `dir/<dat_file_name(label)>`, creating `dir` if needed
    pub fn create(dir: &Path, label: &RunLabel) -> Result<(Self, PathBuf)> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(dat_file_name(label));
        let file = File::create(&path)?;
        log::info!("Writing {}", path.display());
        Ok((Self::new(BufWriter::new(file)), path))
    }
}

impl<W: Write> DatWriter<W> {
    /// Wrap any writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0,
        }
    }

    /// Append one record line
    pub fn write_record(&mut self, record: &TimeSeriesRecord) -> Result<()> {
        let columns = [
            record.elapsed_days,
            record.product_rate_M_per_sec * SECONDS_PER_MINUTE,
            record.concentration_nM,
            record.substrate_bound_M,
            record.active_unbound_M,
            record.inactive_unbound_M,
            record.inhibited_M,
        ];
        let line = columns
            .iter()
            .map(|v| format_scientific(*v))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(self.writer, "{}", line)?;
        self.records_written += 1;
        Ok(())
    }

    /// Records written so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
