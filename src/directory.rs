//! Directory access traits.
//!
//! The pipelines only ever see these traits; the Graph and LDAP clients in
//! [`crate::graph`] and [`crate::ad`] are the production implementations,
//! and the tests substitute in-memory fakes.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ReportResult;

/// One user as enumerated from the cloud directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryUser {
    /// Directory object ID.
    pub id: String,
    /// User principal name, the correlation key for on-prem lookups.
    #[serde(rename = "userPrincipalName")]
    pub user_principal_name: String,
}

/// One registered authentication method descriptor.
///
/// Only the OData type tag matters for the report; per-method detail fields
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthMethod {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
}

/// Read access to the cloud directory.
#[async_trait]
pub trait CloudDirectory {
    /// Enumerates all users. Failure here is fatal to a collector run.
    async fn list_users(&self) -> ReportResult<Vec<DirectoryUser>>;

    /// Lists the registered authentication methods for one user.
    async fn list_auth_methods(&self, user_principal_name: &str)
        -> ReportResult<Vec<AuthMethod>>;
}

/// One on-prem account as fetched from Active Directory.
///
/// Raw attribute values; formatting into report fields happens in
/// [`crate::enrich`].
#[derive(Debug, Clone, Default)]
pub struct AdAccount {
    pub distinguished_name: String,
    pub enabled: bool,
    pub mobile: Option<String>,
    pub manager_dn: Option<String>,
    pub mail: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    /// FILETIME values (100ns intervals since 1601-01-01); zero means never.
    pub last_logon: Option<i64>,
    pub pwd_last_set: Option<i64>,
    pub last_logon_timestamp: Option<i64>,
    /// AD GeneralizedTime string, e.g. `20240115103000.0Z`.
    pub when_created: Option<String>,
}

/// Read access to the on-prem directory.
#[async_trait]
pub trait AccountDirectory {
    /// Looks up an account by user principal name. `Ok(None)` is a genuine
    /// miss; `Err` is a lookup failure. The enricher treats both the same
    /// way in the output but logs them distinctly.
    async fn find_by_principal_name(
        &self,
        user_principal_name: &str,
    ) -> ReportResult<Option<AdAccount>>;

    /// Resolves a manager DN to a display name.
    async fn resolve_manager_display_name(&self, manager_dn: &str)
        -> ReportResult<Option<String>>;
}
