#![warn(clippy::uninlined_format_args)]

mod config;
mod discovery;
mod output;
mod scaffold;

use anyhow::Context;
use billsplit_application::{BillingSources, SplitOutcome, SplitProcessor};
use billsplit_domain::AllocationContext;
use billsplit_infrastructure::{CsvUsageParser, TomlBillParser};
use billsplit_presentation::CsvReportPresenter;
use clap::{Parser, Subcommand};
use config::AllocationArgs;
use discovery::{BillingFiles, discover_billing_files};
use std::{
    fs,
    path::{Path, PathBuf},
    process,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Splits a shared phone plan bill across its devices.
#[derive(Parser)]
#[command(name = "billsplit", version)]
struct Cli {
    #[command(flatten)]
    allocation: AllocationArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a billing directory with a starter bill.toml
    New {
        #[arg(default_value = scaffold::DEFAULT_BILLING_DIR)]
        dir: PathBuf,
    },

    /// Split the bill found in a billing directory and write the invoice and
    /// report next to it
    Dir {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Split a bill from explicitly named files
    Files {
        #[arg(long)]
        bill: PathBuf,
        #[arg(long)]
        minutes: PathBuf,
        #[arg(long)]
        messages: PathBuf,
        #[arg(long)]
        megabytes: PathBuf,
        /// Directory for the invoice and report; the report is printed when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::New { dir } => {
            let bill_path = scaffold::create_billing_dir(&dir)?;
            println!("1. Enter values in {}", bill_path.display());
            println!("2. Add the minutes, messages and megabytes CSV exports to the directory");
            println!("3. Run `billsplit dir {}`", dir.display());
            Ok(())
        }
        Command::Dir { dir } => {
            let context = cli.allocation.to_context()?;
            let files = discover_billing_files(&dir)?;
            tracing::info!(dir = %dir.display(), "Splitting billing directory");
            let outcome = split_files(&files, context)?;
            print_written(&output::write_outputs(&dir, &outcome.bill, &outcome.split)?);
            Ok(())
        }
        Command::Files {
            bill,
            minutes,
            messages,
            megabytes,
            out,
        } => {
            let context = cli.allocation.to_context()?;
            let files = BillingFiles {
                bill,
                minutes,
                messages,
                megabytes,
            };
            let outcome = split_files(&files, context)?;
            match out {
                Some(dir) => {
                    print_written(&output::write_outputs(&dir, &outcome.bill, &outcome.split)?)
                }
                None => print!(
                    "{}",
                    CsvReportPresenter::render(&outcome.bill, &outcome.split)?
                ),
            }
            Ok(())
        }
    }
}

fn split_files(files: &BillingFiles, context: AllocationContext) -> anyhow::Result<SplitOutcome> {
    let bill = read_input(&files.bill)?;
    let minutes = read_input(&files.minutes)?;
    let messages = read_input(&files.messages)?;
    let megabytes = read_input(&files.megabytes)?;

    let processor = SplitProcessor::new(&TomlBillParser, &CsvUsageParser, context);
    let outcome = processor.process(&BillingSources {
        bill: &bill,
        minutes: &minutes,
        messages: &messages,
        megabytes: &megabytes,
    })?;
    Ok(outcome)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_written(outputs: &output::WrittenOutputs) {
    println!("Invoice: {}", outputs.invoice.display());
    println!("Report: {}", outputs.report.display());
}
