//! Error types and exit codes.

use thiserror::Error;

/// Result type alias using [`ReportError`].
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can abort a reporting run.
///
/// Per-record lookup failures are *not* represented here; the pipelines
/// recover from those by marking the affected record and continuing.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Configuration validation error (missing or malformed setting).
    #[error("Configuration error: {0}")]
    Config(String),

    /// OAuth2 authentication error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Microsoft Graph API error.
    #[error("Graph API error: {code} - {message}")]
    GraphApi { code: String, message: String },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// LDAP protocol or connection error.
    #[error("LDAP error: {0}")]
    Ldap(#[from] ldap3::LdapError),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file is missing required columns.
    #[error("Invalid input file: {0}")]
    InvalidInput(String),
}

impl ReportError {
    /// Exit code for this error.
    /// - 1: general / I/O
    /// - 2: authentication
    /// - 3: network / directory service
    /// - 4: configuration or input validation
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::Config(_) | ReportError::InvalidInput(_) => 4,
            ReportError::Auth(_) => 2,
            ReportError::GraphApi { .. } | ReportError::Http(_) | ReportError::Ldap(_) => 3,
            ReportError::Csv(_) | ReportError::Json(_) | ReportError::Io(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting.
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }
    }
}
