//! MFA registration reporting for Microsoft Entra ID, with Active Directory
//! enrichment.
//!
//! Three pipelines, composed by CSV hand-off:
//!
//! - **collect** — enumerate every Entra user, record which authentication
//!   methods each has registered, and write one row per user.
//! - **enrich** — cross-reference a collected report against on-prem AD and
//!   copy account attributes (enabled state, manager, mobile, timestamps)
//!   onto each row.
//! - **enrich --normalize-mobile** — same, plus canonicalization of the AD
//!   mobile number into a 10-digit string.
//!
//! Directory access goes through the [`directory::CloudDirectory`] and
//! [`directory::AccountDirectory`] traits so the pipelines can be exercised
//! without live services.

pub mod ad;
pub mod collector;
pub mod commands;
pub mod config;
pub mod directory;
pub mod enrich;
pub mod error;
pub mod graph;
pub mod phone;
pub mod record;
pub mod report;

pub use collector::{collect_mfa_report, CollectSummary};
pub use directory::{AccountDirectory, AdAccount, AuthMethod, CloudDirectory, DirectoryUser};
pub use enrich::{enrich_records, EnrichOptions, EnrichSummary};
pub use error::{ReportError, ReportResult};
pub use phone::normalize_mobile;
pub use record::{EnrichedRecord, MfaMethodKind, MfaStatus, UserMfaRecord};
