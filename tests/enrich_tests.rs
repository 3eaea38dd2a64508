//! Enrichment pipeline tests against an in-memory account directory.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use mfa_report::enrich::{enrich_records, EnrichOptions};
use mfa_report::{
    AccountDirectory, AdAccount, MfaMethodKind, ReportError, ReportResult, UserMfaRecord,
};

/// In-memory account directory fake.
#[derive(Default)]
struct FakeAccountDirectory {
    accounts: HashMap<String, AdAccount>,
    managers: HashMap<String, String>,
    error_upns: HashSet<String>,
    failing_manager_dns: HashSet<String>,
}

#[async_trait]
impl AccountDirectory for FakeAccountDirectory {
    async fn find_by_principal_name(&self, upn: &str) -> ReportResult<Option<AdAccount>> {
        if self.error_upns.contains(upn) {
            return Err(ReportError::Config(format!("lookup blew up for {}", upn)));
        }
        Ok(self.accounts.get(upn).cloned())
    }

    async fn resolve_manager_display_name(&self, dn: &str) -> ReportResult<Option<String>> {
        if self.failing_manager_dns.contains(dn) {
            return Err(ReportError::Config(format!("resolution failed for {}", dn)));
        }
        Ok(self.managers.get(dn).cloned())
    }
}

fn collected(upn: &str) -> UserMfaRecord {
    let mut record = UserMfaRecord::new(upn);
    record.apply_method(MfaMethodKind::Password);
    record.apply_method(MfaMethodKind::Phone);
    record
}

fn full_account() -> AdAccount {
    AdAccount {
        distinguished_name: "CN=Alice,OU=Staff,DC=corp,DC=example,DC=com".to_string(),
        enabled: true,
        mobile: Some("(555) 123-4567".to_string()),
        manager_dn: Some("CN=Boss,OU=Staff,DC=corp,DC=example,DC=com".to_string()),
        mail: Some("alice@corp.example.com".to_string()),
        title: Some("Engineer".to_string()),
        company: Some("Example Corp".to_string()),
        department: Some("IT".to_string()),
        description: None,
        // 2024-01-01T00:00:00Z as FILETIME
        last_logon: Some(133_485_408_000_000_000),
        pwd_last_set: Some(0),
        last_logon_timestamp: None,
        when_created: Some("20230601120000.0Z".to_string()),
    }
}

#[tokio::test]
async fn test_found_account_is_fully_mapped() {
    let mut directory = FakeAccountDirectory::default();
    directory
        .accounts
        .insert("alice@corp.example.com".to_string(), full_account());
    directory.managers.insert(
        "CN=Boss,OU=Staff,DC=corp,DC=example,DC=com".to_string(),
        "Boss Person".to_string(),
    );

    let records = vec![collected("alice@corp.example.com")];
    let (rows, summary) = enrich_records(&directory, &records, EnrichOptions::default())
        .await
        .unwrap();

    let row = &rows[0];
    assert!(row.found);
    assert!(row.enabled);
    assert_eq!(row.manager, "Boss Person");
    assert_eq!(row.mail, "alice@corp.example.com");
    assert_eq!(row.title, "Engineer");
    assert_eq!(row.company, "Example Corp");
    assert_eq!(row.department, "IT");
    assert_eq!(row.description, "N/A");
    assert_eq!(row.mobile_raw, "(555) 123-4567");
    assert_eq!(row.mobile_normalized, "N/A"); // normalization off
    assert_eq!(row.last_logon, "2024-01-01 00:00:00");
    assert_eq!(row.pwd_last_set, "Never");
    assert_eq!(row.last_logon_timestamp, "Never");
    assert_eq!(row.when_created, "2023-06-01 12:00:00");
    assert_eq!(
        row.distinguished_name,
        "CN=Alice,OU=Staff,DC=corp,DC=example,DC=com"
    );
    // Collected fields survive.
    assert!(row.password);
    assert!(row.phone);

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.not_found, 0);
}

#[tokio::test]
async fn test_missing_account_yields_defaults() {
    let directory = FakeAccountDirectory::default();

    let records = vec![collected("ghost@corp.example.com")];
    let (rows, summary) = enrich_records(&directory, &records, EnrichOptions::default())
        .await
        .unwrap();

    let row = &rows[0];
    assert!(!row.found);
    assert!(!row.enabled);
    assert_eq!(row.mobile_raw, "N/A");
    assert_eq!(row.manager, "N/A");
    assert_eq!(row.distinguished_name, "N/A");
    assert_eq!(summary.not_found, 1);
}

#[tokio::test]
async fn test_lookup_error_matches_not_found_row() {
    let mut with_error = FakeAccountDirectory::default();
    with_error
        .error_upns
        .insert("ghost@corp.example.com".to_string());
    let without = FakeAccountDirectory::default();

    let records = vec![collected("ghost@corp.example.com")];

    let (errored, _) = enrich_records(&with_error, &records, EnrichOptions::default())
        .await
        .unwrap();
    let (missed, _) = enrich_records(&without, &records, EnrichOptions::default())
        .await
        .unwrap();

    // The exported row is identical regardless of the failure cause.
    assert_eq!(errored, missed);
}

#[tokio::test]
async fn test_manager_resolution_failure_is_not_found() {
    let mut directory = FakeAccountDirectory::default();
    let account = full_account();
    directory
        .failing_manager_dns
        .insert(account.manager_dn.clone().unwrap());
    directory
        .accounts
        .insert("alice@corp.example.com".to_string(), account);

    let records = vec![collected("alice@corp.example.com")];
    let (rows, _) = enrich_records(&directory, &records, EnrichOptions::default())
        .await
        .unwrap();

    assert!(rows[0].found);
    assert_eq!(rows[0].manager, "N/A");
}

#[tokio::test]
async fn test_empty_mobile_is_blank() {
    let mut directory = FakeAccountDirectory::default();
    let mut account = full_account();
    account.mobile = Some(String::new());
    account.manager_dn = None;
    directory
        .accounts
        .insert("alice@corp.example.com".to_string(), account);

    let records = vec![collected("alice@corp.example.com")];
    let (rows, _) = enrich_records(&directory, &records, EnrichOptions::default())
        .await
        .unwrap();

    assert_eq!(rows[0].mobile_raw, "blank");
    assert_eq!(rows[0].manager, "N/A");
}

#[tokio::test]
async fn test_normalization_success() {
    let mut directory = FakeAccountDirectory::default();
    directory
        .accounts
        .insert("alice@corp.example.com".to_string(), full_account());

    let records = vec![collected("alice@corp.example.com")];
    let options = EnrichOptions {
        normalize_mobile: true,
    };
    let (rows, summary) = enrich_records(&directory, &records, options).await.unwrap();

    assert_eq!(rows[0].mobile_raw, "(555) 123-4567");
    assert_eq!(rows[0].mobile_normalized, "5551234567");
    assert_eq!(summary.invalid_mobile, 0);
}

#[tokio::test]
async fn test_normalization_failure_marks_invalid() {
    let mut directory = FakeAccountDirectory::default();
    let mut account = full_account();
    account.mobile = Some("12345".to_string());
    directory
        .accounts
        .insert("alice@corp.example.com".to_string(), account);

    let records = vec![collected("alice@corp.example.com")];
    let options = EnrichOptions {
        normalize_mobile: true,
    };
    let (rows, summary) = enrich_records(&directory, &records, options).await.unwrap();

    assert_eq!(rows[0].mobile_raw, "Invalid");
    assert_eq!(rows[0].mobile_normalized, "N/A");
    assert_eq!(summary.invalid_mobile, 1);
}

#[tokio::test]
async fn test_malformed_when_created_passes_through() {
    let mut directory = FakeAccountDirectory::default();
    let mut account = full_account();
    account.manager_dn = None;
    // Multi-byte char straddling the date prefix; must not abort the run.
    account.when_created = Some("1234567890123é".to_string());
    directory
        .accounts
        .insert("alice@corp.example.com".to_string(), account);

    let records = vec![collected("alice@corp.example.com")];
    let (rows, summary) = enrich_records(&directory, &records, EnrichOptions::default())
        .await
        .unwrap();

    assert_eq!(rows[0].when_created, "1234567890123é");
    assert_eq!(summary.processed, 1);
}

#[tokio::test]
async fn test_output_preserves_input_order() {
    let mut directory = FakeAccountDirectory::default();
    directory
        .accounts
        .insert("b@corp.example.com".to_string(), full_account());

    let records = vec![
        collected("c@corp.example.com"),
        collected("b@corp.example.com"),
        collected("a@corp.example.com"),
    ];
    let (rows, _) = enrich_records(&directory, &records, EnrichOptions::default())
        .await
        .unwrap();

    let upns: Vec<&str> = rows.iter().map(|r| r.user_principal_name.as_str()).collect();
    assert_eq!(
        upns,
        vec!["c@corp.example.com", "b@corp.example.com", "a@corp.example.com"]
    );
}
