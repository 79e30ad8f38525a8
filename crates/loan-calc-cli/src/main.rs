mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::batch::BatchArgs;
use commands::loan::LoanArgs;
use commands::StrategyArg;

/// Loan repayment calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan repayment calculations",
    long_about = "Computes monthly payment, total paid and total interest for a loan \
                  under either the reducing-balance annuity model or the simple \
                  annualized interest model."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Repayment model used when a request does not name one
    #[arg(
        long,
        value_enum,
        env = "LOANCALC_STRATEGY",
        default_value_t = StrategyArg::SimpleAnnualized,
        global = true
    )]
    strategy: StrategyArg,

    /// Print un-rounded figures instead of 2-dp currency amounts
    #[arg(long, global = true)]
    exact: bool,

    /// Log calculation steps to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate repayments for one loan with the configured model
    Calculate(LoanArgs),
    /// Calculate one loan under both models side by side
    Compare(LoanArgs),
    /// Recalculate a JSON array of loans
    Batch(BatchArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let configured = cli.strategy.into();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::loan::run_calculate(args, configured, cli.exact),
        Commands::Compare(args) => commands::loan::run_compare(args, cli.exact),
        Commands::Batch(args) => commands::batch::run_batch(args, configured, cli.exact),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
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
