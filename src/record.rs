//! Report record types and authentication-method mapping.

use serde::{Deserialize, Serialize};

/// Placeholder written for attributes that are absent or unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder written for a mobile attribute that is empty in the directory.
pub const BLANK: &str = "blank";

/// Placeholder written for a mobile value that failed normalization.
pub const INVALID: &str = "Invalid";

/// Placeholder written for a zero/absent directory timestamp.
pub const NEVER: &str = "Never";

/// Overall MFA state for a user.
///
/// `Enabled` means at least one method other than password is registered;
/// a password registration alone never enables MFA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MfaStatus {
    Enabled,
    Disabled,
}

/// The recognized authentication-method kinds.
///
/// Each maps one-to-one onto a flag of [`UserMfaRecord`]. Unrecognized
/// OData type tags deliberately map to nothing so that new method types
/// introduced by the Graph API do not fail a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MfaMethodKind {
    Email,
    Fido2,
    AuthenticatorApp,
    Password,
    Phone,
    SoftwareOath,
    TemporaryAccessPass,
    HelloForBusiness,
}

impl MfaMethodKind {
    /// Maps a Graph API OData type tag to a method kind.
    ///
    /// Returns `None` for unknown tags; callers ignore those by design.
    pub fn from_odata_type(tag: &str) -> Option<Self> {
        match tag {
            "#microsoft.graph.emailAuthenticationMethod" => Some(Self::Email),
            "#microsoft.graph.fido2AuthenticationMethod" => Some(Self::Fido2),
            "#microsoft.graph.microsoftAuthenticatorAuthenticationMethod" => {
                Some(Self::AuthenticatorApp)
            }
            "#microsoft.graph.passwordAuthenticationMethod" => Some(Self::Password),
            "#microsoft.graph.phoneAuthenticationMethod" => Some(Self::Phone),
            "#microsoft.graph.softwareOathAuthenticationMethod" => Some(Self::SoftwareOath),
            "#microsoft.graph.temporaryAccessPassAuthenticationMethod" => {
                Some(Self::TemporaryAccessPass)
            }
            "#microsoft.graph.windowsHelloForBusinessAuthenticationMethod" => {
                Some(Self::HelloForBusiness)
            }
            _ => None,
        }
    }
}

/// One row of the collected MFA report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMfaRecord {
    pub user_principal_name: String,
    pub mfa_status: MfaStatus,
    pub email: bool,
    pub fido2: bool,
    pub app: bool,
    pub password: bool,
    pub phone: bool,
    pub software_oath: bool,
    pub temp_access: bool,
    pub hello_business: bool,
}

impl UserMfaRecord {
    /// Creates a record with every flag false and MFA disabled.
    pub fn new(user_principal_name: impl Into<String>) -> Self {
        Self {
            user_principal_name: user_principal_name.into(),
            mfa_status: MfaStatus::Disabled,
            email: false,
            fido2: false,
            app: false,
            password: false,
            phone: false,
            software_oath: false,
            temp_access: false,
            hello_business: false,
        }
    }

    /// Records one registered method: sets the matching flag, and marks MFA
    /// enabled for every kind except password.
    pub fn apply_method(&mut self, kind: MfaMethodKind) {
        match kind {
            MfaMethodKind::Email => self.email = true,
            MfaMethodKind::Fido2 => self.fido2 = true,
            MfaMethodKind::AuthenticatorApp => self.app = true,
            MfaMethodKind::Password => self.password = true,
            MfaMethodKind::Phone => self.phone = true,
            MfaMethodKind::SoftwareOath => self.software_oath = true,
            MfaMethodKind::TemporaryAccessPass => self.temp_access = true,
            MfaMethodKind::HelloForBusiness => self.hello_business = true,
        }

        if kind != MfaMethodKind::Password {
            self.mfa_status = MfaStatus::Enabled;
        }
    }
}

/// One row of the enriched report: the collected MFA fields plus on-prem
/// directory attributes.
///
/// The CSV layer cannot flatten nested structs, so the collector fields are
/// repeated inline rather than embedded as a `UserMfaRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub user_principal_name: String,
    pub mfa_status: MfaStatus,
    pub email: bool,
    pub fido2: bool,
    pub app: bool,
    pub password: bool,
    pub phone: bool,
    pub software_oath: bool,
    pub temp_access: bool,
    pub hello_business: bool,
    pub found: bool,
    pub enabled: bool,
    pub mobile_raw: String,
    pub mobile_normalized: String,
    pub manager: String,
    pub mail: String,
    pub title: String,
    pub company: String,
    pub department: String,
    pub description: String,
    pub last_logon: String,
    pub pwd_last_set: String,
    pub last_logon_timestamp: String,
    pub when_created: String,
    pub distinguished_name: String,
}

impl EnrichedRecord {
    /// Creates the not-found shape for a collected record: every directory
    /// attribute at its default. A lookup that errors produces the same row
    /// as a genuine miss, matching what downstream consumers of prior
    /// reports expect.
    pub fn not_found(source: &UserMfaRecord) -> Self {
        Self {
            user_principal_name: source.user_principal_name.clone(),
            mfa_status: source.mfa_status,
            email: source.email,
            fido2: source.fido2,
            app: source.app,
            password: source.password,
            phone: source.phone,
            software_oath: source.software_oath,
            temp_access: source.temp_access,
            hello_business: source.hello_business,
            found: false,
            enabled: false,
            mobile_raw: NOT_AVAILABLE.to_string(),
            mobile_normalized: NOT_AVAILABLE.to_string(),
            manager: NOT_AVAILABLE.to_string(),
            mail: NOT_AVAILABLE.to_string(),
            title: NOT_AVAILABLE.to_string(),
            company: NOT_AVAILABLE.to_string(),
            department: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
            last_logon: NEVER.to_string(),
            pwd_last_set: NEVER.to_string(),
            last_logon_timestamp: NEVER.to_string(),
            when_created: NOT_AVAILABLE.to_string(),
            distinguished_name: NOT_AVAILABLE.to_string(),
        }
    }
}
