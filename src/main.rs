//! mfa-report - MFA registration reporting for Entra ID with Active
//! Directory enrichment.
//!
//! Subcommands:
//! - `collect` — enumerate directory users and their registered MFA methods
//! - `enrich` — cross-reference a collected report against on-prem AD

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mfa_report::commands;
use mfa_report::ReportResult;

/// MFA registration reporting
#[derive(Parser)]
#[command(name = "mfa-report")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect MFA registration state for every directory user
    Collect(commands::collect::CollectArgs),

    /// Enrich a collected report with on-prem directory attributes
    Enrich(commands::enrich::EnrichArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> ReportResult<()> {
    match cli.command {
        Commands::Collect(args) => commands::collect::execute(args).await,
        Commands::Enrich(args) => commands::enrich::execute(args).await,
    }
}
