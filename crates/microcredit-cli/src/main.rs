mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::OlbArgs;
use commands::provisioning::ProvisionRateArgs;
use commands::regrading::RegradeArgs;

/// Microfinance loan servicing calculations
#[derive(Parser)]
#[command(
    name = "mfi",
    version,
    about = "Microfinance loan servicing calculations",
    long_about = "A CLI for microfinance loan servicing calculations with decimal \
                  precision. Computes outstanding balances, accrued interest, and \
                  the maximum amount a client may pay to fully regrade a loan as \
                  of a date, plus loss-provisioning rate lookups."
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
    /// Maximum amount to fully regrade a loan as of a date
    Regrade(RegradeArgs),
    /// Outstanding loan balance and accrued interest as of a date
    Olb(OlbArgs),
    /// Look up a loss-provisioning rate by rank or days late
    ProvisionRate(ProvisionRateArgs),
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
        Commands::Regrade(args) => commands::regrading::run_regrade(args),
        Commands::Olb(args) => commands::loan::run_olb(args),
        Commands::ProvisionRate(args) => commands::provisioning::run_provision_rate(args),
        Commands::Version => {
            println!("mfi {}", env!("CARGO_PKG_VERSION"));
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
