//! LDAP implementation of the on-prem directory interface.

mod filetime;

pub use filetime::{format_filetime, format_generalized_time};

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::config::LdapSettings;
use crate::directory::{AccountDirectory, AdAccount};
use crate::error::ReportResult;

/// `userAccountControl` bit for a disabled account.
const UAC_ACCOUNT_DISABLE: u32 = 0x2;

/// Attributes fetched for each account lookup.
const ACCOUNT_ATTRS: &[&str] = &[
    "distinguishedName",
    "userAccountControl",
    "mobile",
    "manager",
    "mail",
    "title",
    "company",
    "department",
    "description",
    "lastLogon",
    "pwdLastSet",
    "lastLogonTimestamp",
    "whenCreated",
];

/// On-prem directory backed by an LDAP connection to Active Directory.
///
/// The session lifecycle is explicit: [`connect`] binds once up front and
/// [`close`] unbinds after the run. All lookups reuse the bound session.
///
/// [`connect`]: LdapDirectory::connect
/// [`close`]: LdapDirectory::close
pub struct LdapDirectory {
    ldap: Ldap,
    search_base: String,
}

impl LdapDirectory {
    /// Connects and binds to the directory.
    pub async fn connect(settings: &LdapSettings) -> ReportResult<Self> {
        settings.validate()?;

        debug!(url = %settings.url, "Connecting to LDAP server");

        let conn_settings = LdapConnSettings::new().set_conn_timeout(
            std::time::Duration::from_secs(settings.connection_timeout_secs),
        );

        let (conn, mut ldap) = LdapConnAsync::with_settings(conn_settings, &settings.url).await?;

        // Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        debug!(bind_dn = %settings.bind_dn, "Performing LDAP bind");
        ldap.simple_bind(&settings.bind_dn, settings.bind_password.expose_secret())
            .await?
            .success()?;

        info!(url = %settings.url, "LDAP connection established");

        Ok(Self {
            ldap,
            search_base: settings.search_base.clone(),
        })
    }

    /// Unbinds and releases the session.
    pub async fn close(mut self) -> ReportResult<()> {
        self.ldap.unbind().await?;
        Ok(())
    }

    /// Escape special characters in LDAP filter values (RFC 4515).
    fn escape_filter_value(value: &str) -> String {
        value
            .replace('\\', "\\5c")
            .replace('*', "\\2a")
            .replace('(', "\\28")
            .replace(')', "\\29")
            .replace('\0', "\\00")
    }

    /// Maps a search entry onto the raw account shape.
    fn entry_to_account(entry: SearchEntry) -> AdAccount {
        let get = |name: &str| -> Option<String> {
            entry
                .attrs
                .get(name)
                .and_then(|values| values.first())
                .map(String::to_owned)
        };

        let get_i64 = |name: &str| -> Option<i64> {
            entry
                .attrs
                .get(name)
                .and_then(|values| values.first())
                .and_then(|v| v.parse().ok())
        };

        let uac: u32 = get("userAccountControl")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        AdAccount {
            distinguished_name: get("distinguishedName").unwrap_or_else(|| entry.dn.clone()),
            enabled: uac & UAC_ACCOUNT_DISABLE == 0,
            mobile: get("mobile"),
            manager_dn: get("manager"),
            mail: get("mail"),
            title: get("title"),
            company: get("company"),
            department: get("department"),
            description: get("description"),
            last_logon: get_i64("lastLogon"),
            pwd_last_set: get_i64("pwdLastSet"),
            last_logon_timestamp: get_i64("lastLogonTimestamp"),
            when_created: get("whenCreated"),
        }
    }
}

#[async_trait]
impl AccountDirectory for LdapDirectory {
    async fn find_by_principal_name(
        &self,
        user_principal_name: &str,
    ) -> ReportResult<Option<AdAccount>> {
        let filter = format!(
            "(&(objectClass=user)(userPrincipalName={}))",
            Self::escape_filter_value(user_principal_name)
        );

        debug!(upn = %user_principal_name, "Searching directory");

        let mut ldap = self.ldap.clone();
        let (entries, _result) = ldap
            .search(&self.search_base, Scope::Subtree, &filter, ACCOUNT_ATTRS)
            .await?
            .success()?;

        Ok(entries
            .into_iter()
            .next()
            .map(|e| Self::entry_to_account(SearchEntry::construct(e))))
    }

    async fn resolve_manager_display_name(
        &self,
        manager_dn: &str,
    ) -> ReportResult<Option<String>> {
        let mut ldap = self.ldap.clone();
        let (entries, _result) = ldap
            .search(manager_dn, Scope::Base, "(objectClass=*)", ["displayName"])
            .await?
            .success()?;

        Ok(entries.into_iter().next().and_then(|e| {
            SearchEntry::construct(e)
                .attrs
                .get("displayName")
                .and_then(|values| values.first())
                .map(String::to_owned)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(
            LdapDirectory::escape_filter_value("a*(b)\\c"),
            "a\\2a\\28b\\29\\5cc"
        );
    }

    #[test]
    fn test_escape_filter_value_plain_upn() {
        assert_eq!(
            LdapDirectory::escape_filter_value("alice@corp.example.com"),
            "alice@corp.example.com"
        );
    }
}
