//! Kinase Resistance Sim - Entry point
//!
//! Simulates BCR-ABL mutant activity under repeated oral inhibitor dosing.
//!
//! CLI Usage:
//!   cargo run --release                                  # All drugs x default mutants
//!   cargo run --release -- --drug Imatinib --mutant T315I
//!   cargo run --release -- --days 2 --dt 0.01 --csv --out results

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use kinase_resistance_sim::{
    config::DEFAULT_PARAMETERS_PATH,
    export::{export_summaries_json, write_runs},
    DeltaGBound, ParameterTable, RunOrchestrator, RunSummary, SimulationParameters,
};

/// Command-line options
#[derive(Debug)]
struct CliOptions {
    days: Option<f64>,
    dt_sec: Option<f64>,
    drugs: Vec<String>,
    mutants: Vec<String>,
    params_path: PathBuf,
    table_path: Option<PathBuf>,
    out_dir: PathBuf,
    csv: bool,
    bound: DeltaGBound,
}

fn print_help() {
    println!("Kinase Resistance Sim");
    println!();
    println!("Usage: kinase-resistance-sim [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --days D           Simulated horizon in days (default: from parameters)");
    println!("  --dt S             Timestep in seconds (default: from parameters)");
    println!("  --drug NAME        Drug to simulate, repeatable (default: all)");
    println!("  --mutant NAME      Mutant to simulate, repeatable (default: clinical panel)");
    println!("  --params FILE      Run settings JSON (default: {})", DEFAULT_PARAMETERS_PATH);
    println!("  --table FILE       Measured constants JSON (default: built-in table)");
    println!("  --out DIR          Output directory (default: output)");
    println!("  --csv              Also write CSV time series");
    println!("  --bound B          Free-energy bound: nominal, lower or upper");
    println!("  --help, -h         Show this help");
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("{} requires a value", flag))
}

/// Parse command line arguments; `None` when help was requested
fn parse_args() -> Result<Option<CliOptions>> {
    let args: Vec<String> = std::env::args().collect();
    let mut options = CliOptions {
        days: None,
        dt_sec: None,
        drugs: Vec::new(),
        mutants: Vec::new(),
        params_path: PathBuf::from(DEFAULT_PARAMETERS_PATH),
        table_path: None,
        out_dir: PathBuf::from("output"),
        csv: false,
        bound: DeltaGBound::Nominal,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" => {
                let value = next_value(&args, &mut i, "--days")?;
                options.days = Some(value.parse().context("--days expects a number")?);
            }
            "--dt" => {
                let value = next_value(&args, &mut i, "--dt")?;
                options.dt_sec = Some(value.parse().context("--dt expects a number")?);
            }
            "--drug" => options.drugs.push(next_value(&args, &mut i, "--drug")?.to_string()),
            "--mutant" => options
                .mutants
                .push(next_value(&args, &mut i, "--mutant")?.to_string()),
            "--params" => options.params_path = next_value(&args, &mut i, "--params")?.into(),
            "--table" => options.table_path = Some(next_value(&args, &mut i, "--table")?.into()),
            "--out" => options.out_dir = next_value(&args, &mut i, "--out")?.into(),
            "--csv" => options.csv = true,
            "--bound" => {
                options.bound = next_value(&args, &mut i, "--bound")?.parse()?;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            other => bail!("unknown argument '{}' (try --help)", other),
        }
        i += 1;
    }

    Ok(Some(options))
}

fn print_summaries(summaries: &[RunSummary]) {
    println!();
    println!(
        "{:<10} {:<12} {:>8} {:>14} {:>14} {:>10} {:>10}",
        "Drug", "Mutant", "Days", "Mean rate", "Min rate", "Bound", "Inhibited"
    );
    for s in summaries {
        let days = match s.truncated_at_days {
            Some(day) => format!("{:.3}*", day),
            None => format!("{:.3}", s.final_elapsed_days),
        };
        println!(
            "{:<10} {:<12} {:>8} {:>14.4e} {:>14.4e} {:>10.4} {:>10.4}",
            s.label.drug,
            s.label.mutant,
            days,
            s.mean_product_rate_M_per_sec,
            s.min_product_rate_M_per_sec,
            s.final_substrate_bound_fraction,
            s.final_inhibited_fraction
        );
    }
    if summaries.iter().any(|s| s.truncated_at_days.is_some()) {
        println!("* truncated by the stability monitor");
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(options) = parse_args()? else {
        return Ok(());
    };

    let mut params = SimulationParameters::load_or_default(&options.params_path);
    if let Some(days) = options.days {
        params.duration_days = days;
    }
    if let Some(dt_sec) = options.dt_sec {
        params.dt_sec = dt_sec;
    }
    params.validate()?;

    let table = match &options.table_path {
        Some(path) => ParameterTable::load_or_default(path),
        None => ParameterTable::default(),
    };

    let drugs: Vec<String> = if options.drugs.is_empty() {
        table.drugs.iter().map(|d| d.name.clone()).collect()
    } else {
        options.drugs.clone()
    };
    let mutants: Vec<String> = if options.mutants.is_empty() {
        ParameterTable::default_mutant_names()
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        options.mutants.clone()
    };

    let requests = RunOrchestrator::cross_requests(&drugs, &mutants, options.bound);
    let orchestrator = RunOrchestrator::new(table, params)?;

    println!("=== Kinase Resistance Sim ===");
    println!(
        "{} runs, {:.2} days at dt = {} s",
        requests.len(),
        orchestrator.params().duration_days,
        orchestrator.params().dt_sec
    );

    let start = Instant::now();
    let mut summaries = Vec::with_capacity(requests.len());
    let mut failed = 0;
    for result in write_runs(&orchestrator, &requests, &options.out_dir, options.csv) {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                log::error!("{:#}", e);
                failed += 1;
            }
        }
    }
    log::info!("All runs finished in {:.1} s", start.elapsed().as_secs_f64());

    if summaries.is_empty() {
        bail!("all {} runs failed", requests.len());
    }

    print_summaries(&summaries);

    let path = export_summaries_json(&options.out_dir, orchestrator.params(), &summaries)?;
    println!("\nSummary written to {}", path.display());

    if failed > 0 {
        bail!("{} of {} runs failed", failed, requests.len());
    }
    Ok(())
}
