//! Client wrappers for profile endpoints. All calls rely on the attached
//! bearer token.

use crate::{
    app_lib::{ApiClient, ApiError, MultipartFile},
    features::{
        auth::types::{MessageResponse, TokenMessageResponse},
        users::types::ChangeMailOrUsernameRequest,
    },
};

/// Uploads a new avatar as the multipart field `avatar`.
pub async fn update_avatar(
    api: &ApiClient,
    file: MultipartFile,
) -> Result<MessageResponse, ApiError> {
    api.patch_multipart("/api/users/change-user-infos", "avatar", file)
        .await
}

/// Starts a username or email change; the response token feeds the OTP step.
pub async fn change_mail_or_username(
    api: &ApiClient,
    request: &ChangeMailOrUsernameRequest,
) -> Result<TokenMessageResponse, ApiError> {
    api.patch_json("/api/users/change-mail-or-username", request)
        .await
}

/// Starts enabling two-factor login; the response token feeds the OTP step.
pub async fn enable_two_factor(api: &ApiClient) -> Result<TokenMessageResponse, ApiError> {
    api.patch_empty("/api/users/enable-two-factor").await
}
