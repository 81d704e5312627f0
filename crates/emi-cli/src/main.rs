mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::emi::EmiArgs;
use commands::schedule::ScheduleArgs;
use commands::sensitivity::SensitivityArgs;

/// Loan EMI calculations with decimal precision
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI calculations with decimal precision",
    long_about = "A CLI for loan equal-monthly-installment analysis with decimal \
                  precision. Computes the level monthly payment, total interest \
                  and total payment, month-by-month amortization schedules, and \
                  rate sensitivity grids."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the equal monthly installment for a loan
    Emi(EmiArgs),
    /// Build a month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Recompute the EMI across a grid of annual rates
    Sensitivity(SensitivityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
