//! Request and response types for auth-related API calls. Requests carry
//! passwords, one-time codes and verification tokens, so they must never be
//! logged; password fields are kept in `SecretString`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

pub(crate) fn serialize_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Drops empty strings so `Some("")` is never mistaken for a token.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccessResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub has_access: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Login result. A `token` means a two-factor challenge is pending; an
/// `access_token` means the session is already established.
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

#[derive(Clone, Debug, Default, Deserialize)]
/// Generic `{success, message, token?}` response used by register, resend-otp
/// and the profile endpoints that start an OTP round.
pub struct TokenMessageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Kind of one-time code. The query form appears in app routes, the wire form
/// in request bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OtpKind {
    #[serde(rename = "VERIFY_ACCOUNT")]
    MailVerify,
    #[serde(rename = "TWO_FACTOR")]
    TwoFactor,
    #[serde(rename = "EMAIL_CHANGE")]
    EmailChange,
    #[serde(rename = "USERNAME_CHANGE")]
    UsernameChange,
}

impl OtpKind {
    pub const ALL: [OtpKind; 4] = [
        OtpKind::MailVerify,
        OtpKind::TwoFactor,
        OtpKind::EmailChange,
        OtpKind::UsernameChange,
    ];

    #[must_use]
    pub fn query_value(self) -> &'static str {
        match self {
            OtpKind::MailVerify => "mail-verify",
            OtpKind::TwoFactor => "two-factor",
            OtpKind::EmailChange => "email-change",
            OtpKind::UsernameChange => "username-change",
        }
    }

    #[must_use]
    pub fn from_query(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.query_value() == value.trim())
    }
}

/// Result code attached to OTP responses.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum OtpCode {
    EmailVerified,
    TwoFactorEnabled,
    LoginSuccess,
    AccountDeleted,
    Other(String),
}

impl From<String> for OtpCode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "EMAIL_VERIFIED" => OtpCode::EmailVerified,
            "TWO_FACTOR_ENABLED" => OtpCode::TwoFactorEnabled,
            "LOGIN_SUCCESS" => OtpCode::LoginSuccess,
            "ACCOUNT_DELETED" => OtpCode::AccountDeleted,
            _ => OtpCode::Other(value),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(serialize_with = "serialize_secret")]
    pub otp: SecretString,
    pub token: String,
    pub otp_type: OtpKind,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<OtpCode>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    pub token: String,
    pub otp_type: OtpKind,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResetPasswordMailRequest {
    pub email: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResetPasswordApplyRequest {
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
    pub token: String,
}
