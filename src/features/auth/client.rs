//! Client wrappers for the auth API endpoints. These helpers centralize paths
//! and header handling so flows never build requests themselves.

use crate::{
    app_lib::{ApiClient, ApiError, Exchange},
    features::{
        auth::{
            token::SessionToken,
            types::{
                AdminAccessResponse, LoginRequest, LoginResponse, MessageResponse,
                RegisterRequest, ResendOtpRequest, ResetPasswordApplyRequest,
                ResetPasswordMailRequest, TokenMessageResponse, TokenResponse, VerifyOtpRequest,
                VerifyOtpResponse,
            },
        },
        users::types::User,
    },
};

pub const TOKEN_PATH: &str = "/api/auth/get-token";
pub const ADMIN_ACCESS_PATH: &str = "/api/admin/has-access";
pub const USER_INFO_PATH: &str = "/api/users/user-info";

/// Exchanges the ambient cookie credential for a bearer token.
/// Returns `Exchange::Empty` when the API answers 204 (no session).
pub async fn issue_token(api: &ApiClient) -> Result<Exchange<TokenResponse>, ApiError> {
    api.get_optional_json(TOKEN_PATH).await
}

/// Checks admin privilege for the given bearer token.
pub async fn check_admin_access(
    api: &ApiClient,
    token: &SessionToken,
) -> Result<Exchange<AdminAccessResponse>, ApiError> {
    api.get_optional_json_with_bearer(ADMIN_ACCESS_PATH, token.as_secret())
        .await
}

/// Fetches the full user record for the given bearer token.
pub async fn user_info(api: &ApiClient, token: &SessionToken) -> Result<User, ApiError> {
    api.get_json_with_bearer(USER_INFO_PATH, token.as_secret())
        .await
}

/// Credential login. Must never log the request.
pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    api.post_json("/api/auth/login", request).await
}

/// Creates an account and returns the mail-verify OTP token.
pub async fn register(
    api: &ApiClient,
    request: &RegisterRequest,
) -> Result<TokenMessageResponse, ApiError> {
    api.post_json("/api/auth/register", request).await
}

/// Consumes a one-time code.
pub async fn verify_otp(
    api: &ApiClient,
    request: &VerifyOtpRequest,
) -> Result<VerifyOtpResponse, ApiError> {
    api.post_json("/api/auth/verify-otp", request).await
}

/// Reissues a one-time code and returns the replacement token.
pub async fn resend_otp(
    api: &ApiClient,
    request: &ResendOtpRequest,
) -> Result<TokenMessageResponse, ApiError> {
    api.post_json("/api/auth/resend-otp", request).await
}

/// Sends the password reset mail.
pub async fn reset_password_mail(
    api: &ApiClient,
    request: &ResetPasswordMailRequest,
) -> Result<MessageResponse, ApiError> {
    api.post_json("/api/auth/reset-password-mail", request)
        .await
}

/// Applies a new password using the token from the reset mail.
pub async fn reset_password_apply(
    api: &ApiClient,
    request: &ResetPasswordApplyRequest,
) -> Result<MessageResponse, ApiError> {
    api.post_json("/api/auth/reset-password-apply", request)
        .await
}

/// Invalidates the server-side session.
pub async fn logout(api: &ApiClient) -> Result<MessageResponse, ApiError> {
    api.post_empty("/api/auth/logout").await
}
