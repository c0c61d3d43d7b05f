// Entry point and high-level CLI flow.
//
// One invocation is one report: load the export, clean it, group units by
// district, then print the summary and optionally write the dashboard
// files. Nothing is printed until the whole report has been built, so a
// failure never leaves a partial report on screen.
mod aggregate;
mod chart;
mod error;
mod html;
mod loader;
mod normalize;
mod output;
mod report;
mod types;
mod util;

use aggregate::PeriodTarget;
use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use error::ReportError;
use normalize::ColumnNames;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "safety-walks",
    version,
    about = "Safety walk compliance report by district manager (non-ESS units)"
)]
struct Cli {
    /// Spreadsheet export to analyze (.xlsx, .xls, .ods or .csv)
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Current period target: walks expected per unit so far
    #[arg(
        short,
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    target: u32,

    /// Worksheet to read from workbook inputs
    #[arg(long, default_value = loader::DEFAULT_SHEET)]
    sheet: String,

    /// Directory for summary.json, behind_target.csv and dashboard.html
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    out_dir: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let target = PeriodTarget::new(cli.target)?;
    let table = loader::load_table(&cli.input, &cli.sheet)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let (records, load_report) = normalize::normalize(&table, &ColumnNames::default())?;
    let aggregates = aggregate::aggregate(&records, target);
    let report = report::assemble(&aggregates, target);
    debug!(districts = report.districts.len(), "report assembled");

    if let Some(dir) = &cli.out_dir {
        output::write_outputs(dir, &report)
            .with_context(|| format!("failed to write outputs to {}", dir.display()))?;
    }

    println!("{}\n", output::load_summary(&load_report));
    print!("{}", output::render_console(&report));
    if let Some(dir) = &cli.out_dir {
        println!("(Full report exported to {})", dir.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e
            .downcast_ref::<ReportError>()
            .is_some_and(ReportError::is_warning) =>
        {
            warn!("all rows filtered out");
            println!("Warning: No non-ESS units found in the upload.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error processing file: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
