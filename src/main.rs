//! demostat CLI

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use demostat::{calculate, demographic_data_analyzer, viewer, MatrixElement};

const CSV_FILE_PATH: &'static str = "adult.data.csv";

#[derive(Parser)]
#[command(name = "demostat")]
#[command(author, version, about = "Census and matrix summary statistics", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a census extract (13 columns, no header, "?" for missing)
    Demographics {
        /// Input CSV file
        #[arg(default_value = CSV_FILE_PATH)]
        input: PathBuf,
        /// Do not print the text report
        #[arg(short, long)]
        quiet: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Open the interactive viewer
        #[arg(long)]
        view: bool,
    },
    /// Mean, variance, standard deviation, max, min and sum of a 3x3 matrix
    Matrix {
        /// Nine numbers, row-major
        #[arg(allow_negative_numbers = true)]
        values: Vec<String>,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn print_matrix<T: MatrixElement>(values: &[T]) -> Result<()> {
    let stats = calculate(values)?;
    println!("{}", stats.to_json()?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Demographics {
            input,
            quiet,
            json,
            view,
        } => {
            info!("Summarizing {}", input.display());
            let summary = demographic_data_analyzer(&input, !quiet && !json)
                .with_context(|| format!("failed to summarize {}", input.display()))?;
            if json {
                println!("{}", summary.to_json()?);
            }
            if view {
                viewer::show(&summary, &input.display().to_string()).context("viewer failed")?;
            }
        }
        Commands::Matrix { values } => {
            let integers = values
                .iter()
                .map(|v| v.parse::<i64>())
                .collect::<std::result::Result<Vec<_>, _>>();
            match integers {
                Ok(integers) => {
                    debug!("integer matrix input");
                    print_matrix(&integers)?;
                }
                Err(_) => {
                    let floats = values
                        .iter()
                        .map(|v| v.parse::<f64>().with_context(|| format!("not a number: {}", v)))
                        .collect::<Result<Vec<_>>>()?;
                    print_matrix(&floats)?;
                }
            }
        }
    }

    Ok(())
}
