//! Payloads for the admin user-management endpoints.

use crate::features::users::types::{User, UserId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserEditInfoResponse {
    #[serde(default)]
    pub success: bool,
    pub user: User,
}

#[derive(Clone, Debug, Serialize)]
pub struct BanUserRequest {
    pub user_id: UserId,
    pub reason: String,
    /// Ban duration understood by the API, e.g. `1D`.
    pub expire: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnbanUserRequest {
    pub user_id: UserId,
}
