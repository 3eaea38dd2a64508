//! Mobile number normalization.

use thiserror::Error;

/// A mobile value that could not be reduced to 10 digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' has {digits} digits after stripping, expected 10")]
pub struct NormalizeError {
    /// The original input, for operator diagnostics.
    pub input: String,
    /// Digit count after stripping and country-code removal.
    pub digits: usize,
}

/// Normalizes a raw phone number to a 10-digit canonical string.
///
/// Strips everything that is not an ASCII digit, then drops a leading `1`
/// from an 11-digit sequence (US country-code prefix). Anything that does
/// not end up exactly 10 digits long is an error; the caller decides how to
/// record the failure.
pub fn normalize_mobile(raw: &str) -> Result<String, NormalizeError> {
    let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }

    if digits.len() != 10 {
        return Err(NormalizeError {
            input: raw.to_string(),
            digits: digits.len(),
        });
    }

    Ok(digits)
}
