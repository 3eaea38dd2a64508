//! `mfa-report enrich` command.

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::ad::LdapDirectory;
use crate::config::LdapSettings;
use crate::enrich::EnrichOptions;
use crate::error::ReportResult;
use crate::{enrich, report};

/// Enrich a collected MFA report with on-prem directory attributes.
#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// Input CSV produced by `collect`
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Output CSV path
    #[arg(long, short = 'o', default_value = "mfa-report-enriched.csv")]
    pub output: PathBuf,

    /// Canonicalize mobile numbers into 10-digit form
    #[arg(long)]
    pub normalize_mobile: bool,
}

/// Executes the enrich command.
pub async fn execute(args: EnrichArgs) -> ReportResult<()> {
    let records = report::read_mfa_report(&args.input)?;
    info!(rows = records.len(), input = %args.input.display(), "Loaded collected report");

    let settings = LdapSettings::from_env()?;
    let directory = LdapDirectory::connect(&settings).await?;

    let options = EnrichOptions {
        normalize_mobile: args.normalize_mobile,
    };

    let result = enrich::enrich_records(&directory, &records, options).await;

    // Release the session before surfacing any pipeline error.
    directory.close().await?;

    let (enriched, summary) = result?;
    report::write_enriched_report(&enriched, &args.output)?;

    info!(
        processed = summary.processed,
        not_found = summary.not_found,
        invalid_mobile = summary.invalid_mobile,
        output = %args.output.display(),
        "Enrich run finished"
    );

    Ok(())
}
