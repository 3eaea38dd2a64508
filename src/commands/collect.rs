//! `mfa-report collect` command.

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::config::GraphSettings;
use crate::error::ReportResult;
use crate::graph::GraphDirectory;
use crate::{collector, report};

/// Collect MFA registration state for every directory user.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Output CSV path
    #[arg(long, short = 'o', default_value = "mfa-report.csv")]
    pub output: PathBuf,
}

/// Executes the collect command.
pub async fn execute(args: CollectArgs) -> ReportResult<()> {
    let settings = GraphSettings::from_env()?;
    let directory = GraphDirectory::new(settings)?;

    let (records, summary) = collector::collect_mfa_report(&directory).await?;
    report::write_mfa_report(&records, &args.output)?;

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        output = %args.output.display(),
        "Collect run finished"
    );

    Ok(())
}
