//! MFA collection pipeline.

use tracing::{info, warn};

use crate::directory::CloudDirectory;
use crate::error::ReportResult;
use crate::record::{MfaMethodKind, UserMfaRecord};

/// Counts for one collector run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectSummary {
    /// Users with an emitted record.
    pub processed: usize,
    /// Users skipped because their method lookup failed.
    pub skipped: usize,
}

/// Collects one [`UserMfaRecord`] per cloud-directory user.
///
/// A failure enumerating users is fatal and aborts the run with no output.
/// A failure fetching one user's methods skips that user with a warning and
/// continues; the skip count is reported in the summary so an operator can
/// tell a clean report from a partial one.
pub async fn collect_mfa_report<D: CloudDirectory>(
    directory: &D,
) -> ReportResult<(Vec<UserMfaRecord>, CollectSummary)> {
    let users = directory.list_users().await?;
    info!(total = users.len(), "Enumerated directory users");

    let mut records = Vec::with_capacity(users.len());
    let mut summary = CollectSummary::default();

    for user in &users {
        let methods = match directory.list_auth_methods(&user.user_principal_name).await {
            Ok(methods) => methods,
            Err(e) => {
                warn!(
                    upn = %user.user_principal_name,
                    error = %e,
                    "Failed to fetch authentication methods, skipping user"
                );
                summary.skipped += 1;
                continue;
            }
        };

        let mut record = UserMfaRecord::new(&user.user_principal_name);
        for method in &methods {
            // Unknown method types are ignored so new Graph API method
            // kinds do not fail the run.
            if let Some(kind) = MfaMethodKind::from_odata_type(&method.odata_type) {
                record.apply_method(kind);
            }
        }

        info!(
            upn = %user.user_principal_name,
            status = ?record.mfa_status,
            methods = methods.len(),
            "Processed user"
        );

        summary.processed += 1;
        records.push(record);
    }

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        "Collection complete"
    );

    Ok((records, summary))
}
