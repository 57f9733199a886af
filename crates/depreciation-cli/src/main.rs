mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

use commands::depreciation::{NoData, ReportArgs, ScheduleArgs, ValidateArgs};
use output::OutputFormat;

/// Exit status when the filters leave nothing to report.
const EXIT_NO_DATA: i32 = 2;

/// Straight-line depreciation reports for fixed assets
#[derive(Parser)]
#[command(
    name = "deprec",
    version,
    about = "Straight-line depreciation reports for fixed assets",
    long_about = "Computes year-by-year straight-line depreciation schedules for the fixed \
                  assets (type FA) of an asset register, down to each asset's carcass value. \
                  Reports can be filtered by item number and purchase-date range and saved \
                  as CSV."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    output: OutputFormat,

    /// Log debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Depreciation report for every fixed asset of a register
    Report(ReportArgs),
    /// Depreciation schedule of a single asset
    Schedule(ScheduleArgs),
    /// Check which register records are eligible for depreciation
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => commands::depreciation::run_report(args),
        Commands::Schedule(args) => commands::depreciation::run_schedule(args),
        Commands::Validate(args) => commands::depreciation::run_validate(args),
        Commands::Version => {
            println!("deprec {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(cli.output, &value);
            process::exit(0);
        }
        Err(e) if e.is::<NoData>() => {
            eprintln!("{}", e.to_string().yellow());
            process::exit(EXIT_NO_DATA);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
