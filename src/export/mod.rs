//! Output sinks for run records and summaries.
//!
//! Provides the whitespace `.dat` record format, CSV time-series export,
//! and JSON summary export. All sinks consume records as they are produced.

mod csv_export;
mod dat_export;
mod json_export;
mod run_writer;

pub use csv_export::{csv_file_name, CsvExporter};
pub use dat_export::{dat_file_name, format_scientific, DatWriter};
pub use json_export::{export_summaries_json, export_summaries_json_to, SummaryExport};
pub use run_writer::{write_run, write_runs};
