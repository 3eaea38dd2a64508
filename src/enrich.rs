//! Active Directory enrichment pipeline.

use tracing::{info, warn};

use crate::ad::{format_filetime, format_generalized_time};
use crate::directory::{AccountDirectory, AdAccount};
use crate::error::ReportResult;
use crate::phone::normalize_mobile;
use crate::record::{EnrichedRecord, UserMfaRecord, BLANK, INVALID, NOT_AVAILABLE};

/// Options for an enrichment run.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichOptions {
    /// Canonicalize the fetched mobile number into a 10-digit string.
    pub normalize_mobile: bool,
}

/// Counts for one enrichment run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichSummary {
    pub processed: usize,
    /// Records with no matching account, including lookup errors.
    pub not_found: usize,
    /// Mobile values that failed normalization.
    pub invalid_mobile: usize,
}

/// Enriches collected records with on-prem account attributes.
///
/// Each record gets a single lookup attempt. A miss or a lookup error both
/// produce the not-found row shape; the cause is only distinguished in the
/// operator log, keeping the exported columns identical to prior reports.
pub async fn enrich_records<D: AccountDirectory>(
    directory: &D,
    records: &[UserMfaRecord],
    options: EnrichOptions,
) -> ReportResult<(Vec<EnrichedRecord>, EnrichSummary)> {
    let mut enriched = Vec::with_capacity(records.len());
    let mut summary = EnrichSummary::default();

    for record in records {
        let upn = &record.user_principal_name;

        let account = match directory.find_by_principal_name(upn).await {
            Ok(Some(account)) => Some(account),
            Ok(None) => {
                warn!(%upn, "No matching on-prem account");
                None
            }
            Err(e) => {
                warn!(%upn, error = %e, "Directory lookup failed, marking not found");
                None
            }
        };

        let row = match account {
            Some(account) => {
                enrich_found(directory, record, &account, options, &mut summary).await
            }
            None => {
                summary.not_found += 1;
                EnrichedRecord::not_found(record)
            }
        };

        info!(%upn, found = row.found, "Processed record");
        summary.processed += 1;
        enriched.push(row);
    }

    info!(
        processed = summary.processed,
        not_found = summary.not_found,
        invalid_mobile = summary.invalid_mobile,
        "Enrichment complete"
    );

    Ok((enriched, summary))
}

/// Populates a row from a fetched account.
async fn enrich_found<D: AccountDirectory>(
    directory: &D,
    record: &UserMfaRecord,
    account: &AdAccount,
    options: EnrichOptions,
    summary: &mut EnrichSummary,
) -> EnrichedRecord {
    let mut row = EnrichedRecord::not_found(record);
    row.found = true;
    row.enabled = account.enabled;
    row.distinguished_name = account.distinguished_name.clone();

    row.manager = match &account.manager_dn {
        Some(dn) => resolve_manager(directory, &record.user_principal_name, dn).await,
        None => NOT_AVAILABLE.to_string(),
    };

    row.mail = or_not_available(&account.mail);
    row.title = or_not_available(&account.title);
    row.company = or_not_available(&account.company);
    row.department = or_not_available(&account.department);
    row.description = or_not_available(&account.description);

    row.last_logon = format_filetime(account.last_logon);
    row.pwd_last_set = format_filetime(account.pwd_last_set);
    row.last_logon_timestamp = format_filetime(account.last_logon_timestamp);
    row.when_created = account
        .when_created
        .as_deref()
        .map(format_generalized_time)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    match account.mobile.as_deref().filter(|m| !m.is_empty()) {
        Some(mobile) => {
            row.mobile_raw = mobile.to_string();
            if options.normalize_mobile {
                match normalize_mobile(mobile) {
                    Ok(normalized) => row.mobile_normalized = normalized,
                    Err(e) => {
                        warn!(
                            upn = %record.user_principal_name,
                            error = %e,
                            "Mobile number failed normalization"
                        );
                        summary.invalid_mobile += 1;
                        row.mobile_raw = INVALID.to_string();
                    }
                }
            }
        }
        None => row.mobile_raw = BLANK.to_string(),
    }

    row
}

/// Resolves a manager DN, treating resolution failure like a missing
/// manager.
async fn resolve_manager<D: AccountDirectory>(
    directory: &D,
    upn: &str,
    manager_dn: &str,
) -> String {
    match directory.resolve_manager_display_name(manager_dn).await {
        Ok(Some(name)) => name,
        Ok(None) => NOT_AVAILABLE.to_string(),
        Err(e) => {
            warn!(%upn, manager_dn, error = %e, "Manager resolution failed");
            NOT_AVAILABLE.to_string()
        }
    }
}

fn or_not_available(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}
