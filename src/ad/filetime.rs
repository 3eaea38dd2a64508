//! Active Directory timestamp conversion.
//!
//! AD stores logon and password timestamps as FILETIME (100-nanosecond
//! intervals since 1601-01-01 UTC) and `whenCreated` as a GeneralizedTime
//! string such as `20240115103000.0Z`.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::record::NEVER;

/// Seconds between the FILETIME epoch (1601) and the Unix epoch (1970).
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;

/// Report date-time format.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a raw FILETIME value, or the literal `Never` for zero/absent.
///
/// AD uses zero to mean "never happened" for `lastLogon`, `pwdLastSet` and
/// `lastLogonTimestamp`.
pub fn format_filetime(raw: Option<i64>) -> String {
    let Some(ft) = raw else {
        return NEVER.to_string();
    };

    if ft <= 0 {
        return NEVER.to_string();
    }

    let secs = ft / 10_000_000 - FILETIME_UNIX_OFFSET_SECS;
    let nanos = (ft % 10_000_000) * 100;

    match DateTime::<Utc>::from_timestamp(secs, nanos as u32) {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => NEVER.to_string(),
    }
}

/// Formats an AD GeneralizedTime string; unparseable values pass through
/// verbatim so the raw data is still visible in the report.
pub fn format_generalized_time(raw: &str) -> String {
    // Byte 14 may not be a char boundary for garbage attribute values.
    let Some(prefix) = raw.get(..14) else {
        return raw.to_string();
    };

    match NaiveDateTime::parse_from_str(prefix, "%Y%m%d%H%M%S") {
        Ok(dt) => dt.format(DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}
