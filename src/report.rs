//! CSV import/export for report records.
//!
//! Files are read fully into memory and written in one pass; composition
//! between the pipelines is by file hand-off only. Serialization is
//! string-exact: exporting and re-importing a record set preserves every
//! field as written.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

use crate::error::{ReportError, ReportResult};
use crate::record::{EnrichedRecord, UserMfaRecord};

/// Columns the enricher requires in its input file.
const REQUIRED_COLUMNS: &[&str] = &[
    "user_principal_name",
    "mfa_status",
    "email",
    "fido2",
    "app",
    "password",
    "phone",
    "software_oath",
    "temp_access",
    "hello_business",
];

/// Writes records as CSV with a header row.
pub fn write_records<T: Serialize, W: Write>(records: &[T], writer: W) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for record in records {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes collected records to a file.
pub fn write_mfa_report(records: &[UserMfaRecord], path: &Path) -> ReportResult<()> {
    write_records(records, File::create(path)?)?;
    info!(path = %path.display(), rows = records.len(), "Wrote MFA report");
    Ok(())
}

/// Writes enriched records to a file.
pub fn write_enriched_report(records: &[EnrichedRecord], path: &Path) -> ReportResult<()> {
    write_records(records, File::create(path)?)?;
    info!(path = %path.display(), rows = records.len(), "Wrote enriched report");
    Ok(())
}

/// Reads records from CSV content, validating the header first so a
/// mismatched file fails with a column list instead of a row-level type
/// error.
pub fn read_records<T: DeserializeOwned, R: Read>(reader: R) -> ReportResult<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let header_set: std::collections::HashSet<&str> = headers.iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_set.contains(c))
        .collect();

    if !missing.is_empty() {
        return Err(ReportError::InvalidInput(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }

    Ok(records)
}

/// Reads a collected MFA report from a file.
pub fn read_mfa_report(path: &Path) -> ReportResult<Vec<UserMfaRecord>> {
    let records = read_records(File::open(path)?)?;
    info!(path = %path.display(), "Read MFA report");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MfaMethodKind, MfaStatus};

    fn sample_records() -> Vec<UserMfaRecord> {
        let mut a = UserMfaRecord::new("alice@corp.example.com");
        a.apply_method(MfaMethodKind::Password);
        a.apply_method(MfaMethodKind::AuthenticatorApp);

        let b = UserMfaRecord::new("bob@corp.example.com");

        vec![a, b]
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let records = sample_records();

        let mut buf = Vec::new();
        write_records(&records, &mut buf).unwrap();

        let restored: Vec<UserMfaRecord> = read_records(buf.as_slice()).unwrap();
        assert_eq!(restored, records);
    }

    #[test]
    fn test_header_row_written() {
        let records = sample_records();

        let mut buf = Vec::new();
        write_records(&records, &mut buf).unwrap();
        let content = String::from_utf8(buf).unwrap();

        let header = content.lines().next().unwrap();
        assert!(header.starts_with("user_principal_name,mfa_status,email,fido2,app"));
        assert!(content.contains("alice@corp.example.com,Enabled"));
        assert!(content.contains("bob@corp.example.com,Disabled"));
    }

    #[test]
    fn test_missing_columns_rejected() {
        let csv = "user_principal_name,mfa_status\nalice@corp.example.com,Enabled\n";

        let result: ReportResult<Vec<UserMfaRecord>> = read_records(csv.as_bytes());
        let err = result.unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(_)));
        assert!(err.to_string().contains("fido2"));
    }

    #[test]
    fn test_enriched_round_trip() {
        let source = sample_records();
        let rows: Vec<EnrichedRecord> =
            source.iter().map(EnrichedRecord::not_found).collect();

        let mut buf = Vec::new();
        write_records(&rows, &mut buf).unwrap();

        let restored: Vec<EnrichedRecord> = read_records(buf.as_slice()).unwrap();
        assert_eq!(restored, rows);
        assert_eq!(restored[0].mobile_raw, "N/A");
        assert_eq!(restored[0].mfa_status, MfaStatus::Enabled);
    }

    #[test]
    fn test_read_empty_file_yields_no_records() {
        let csv = "user_principal_name,mfa_status,email,fido2,app,password,phone,\
                   software_oath,temp_access,hello_business\n";

        let records: Vec<UserMfaRecord> = read_records(csv.as_bytes()).unwrap();
        assert!(records.is_empty());
    }
}
