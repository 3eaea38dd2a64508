//! Runtime configuration, loaded from environment variables.
//!
//! File paths and the normalization toggle are CLI arguments; everything
//! that amounts to a credential or an endpoint lives in the environment so
//! it never appears in shell history.

use secrecy::SecretString;

use crate::error::{ReportError, ReportResult};

/// Default login endpoint (commercial cloud).
const DEFAULT_LOGIN_ENDPOINT: &str = "https://login.microsoftonline.com";

/// Default Graph endpoint (commercial cloud).
const DEFAULT_GRAPH_ENDPOINT: &str = "https://graph.microsoft.com";

/// Settings for the Graph API connection.
#[derive(Debug)]
pub struct GraphSettings {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: SecretString,
    /// Overridable for sovereign clouds.
    pub login_endpoint: String,
    pub graph_endpoint: String,
}

impl GraphSettings {
    /// Loads settings from `ENTRA_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a config error naming the first missing required variable.
    pub fn from_env() -> ReportResult<Self> {
        Ok(Self {
            tenant_id: require_env("ENTRA_TENANT_ID")?,
            client_id: require_env("ENTRA_CLIENT_ID")?,
            client_secret: require_env("ENTRA_CLIENT_SECRET")?.into(),
            login_endpoint: optional_env("ENTRA_LOGIN_ENDPOINT", DEFAULT_LOGIN_ENDPOINT),
            graph_endpoint: optional_env("ENTRA_GRAPH_ENDPOINT", DEFAULT_GRAPH_ENDPOINT),
        })
    }
}

/// Settings for the on-prem LDAP connection.
#[derive(Debug)]
pub struct LdapSettings {
    /// `ldap://host:389` or `ldaps://host:636`.
    pub url: String,
    pub bind_dn: String,
    pub bind_password: SecretString,
    /// Search base for user lookups, e.g. `DC=corp,DC=example,DC=com`.
    pub search_base: String,
    pub connection_timeout_secs: u64,
}

impl LdapSettings {
    /// Loads settings from `AD_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a config error naming the first missing required variable, or
    /// if the URL does not carry an `ldap://`/`ldaps://` scheme.
    pub fn from_env() -> ReportResult<Self> {
        let settings = Self {
            url: require_env("AD_LDAP_URL")?,
            bind_dn: require_env("AD_BIND_DN")?,
            bind_password: require_env("AD_BIND_PASSWORD")?.into(),
            search_base: require_env("AD_SEARCH_BASE")?,
            connection_timeout_secs: 30,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Validates URL scheme and non-empty search base.
    pub fn validate(&self) -> ReportResult<()> {
        if !self.url.starts_with("ldap://") && !self.url.starts_with("ldaps://") {
            return Err(ReportError::Config(format!(
                "AD_LDAP_URL must start with ldap:// or ldaps://, got '{}'",
                self.url
            )));
        }

        if self.search_base.is_empty() {
            return Err(ReportError::Config(
                "AD_SEARCH_BASE must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn require_env(name: &str) -> ReportResult<String> {
    std::env::var(name)
        .map_err(|_| ReportError::Config(format!("{} is not set", name)))
        .and_then(|v| {
            if v.is_empty() {
                Err(ReportError::Config(format!("{} is empty", name)))
            } else {
                Ok(v)
            }
        })
}

fn optional_env(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
