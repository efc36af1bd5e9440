//! User record as mirrored from the API plus the profile-edit payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User identifier; the API emits it either as a string or as a number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawUserId", into = "String")]
pub struct UserId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Number(i64),
}

impl From<RawUserId> for UserId {
    fn from(raw: RawUserId) -> Self {
        match raw {
            RawUserId::Text(value) => Self(value),
            RawUserId::Number(value) => Self(value.to_string()),
        }
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl UserId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "USER", alias = "user")]
    User,
    #[serde(rename = "ADMIN", alias = "admin")]
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => formatter.write_str("USER"),
            Role::Admin => formatter.write_str("ADMIN"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub url: String,
    pub public_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanStatus {
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, alias = "expires_at", skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Account record returned by `/api/users/user-info` and the admin endpoints.
/// Contains no secrets.
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
    #[serde(rename = "isTwoFactorEnabled", default)]
    pub is_two_factor_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban_status: Option<BanStatus>,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[must_use]
    pub fn is_banned(&self) -> bool {
        self.ban_status.as_ref().is_some_and(|status| status.is_banned)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    UsernameChange,
    EmailChange,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMailOrUsernameRequest {
    pub change_type: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ChangeMailOrUsernameRequest {
    #[must_use]
    pub fn username(username: &str) -> Self {
        Self {
            change_type: ChangeType::UsernameChange,
            username: Some(username.trim().to_string()),
            email: None,
        }
    }

    #[must_use]
    pub fn email(email: &str) -> Self {
        Self {
            change_type: ChangeType::EmailChange,
            username: None,
            email: Some(email.trim().to_string()),
        }
    }
}
