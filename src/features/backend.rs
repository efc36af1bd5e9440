//! The remote API as seen by flows, guards and the auth state.
//!
//! Flows depend on `dyn Backend` instead of a concrete HTTP client so a fake
//! backend can be injected without touching the network. `ApiClient` is the
//! production implementation and simply forwards to the feature clients.

use crate::{
    app_lib::{ApiClient, ApiError, Exchange, MultipartFile},
    features::{
        admin::{
            self,
            types::{BanUserRequest, UnbanUserRequest, UserEditInfoResponse, UserListResponse},
        },
        auth::{
            self,
            token::SessionToken,
            types::{
                AdminAccessResponse, LoginRequest, LoginResponse, MessageResponse,
                RegisterRequest, ResendOtpRequest, ResetPasswordApplyRequest,
                ResetPasswordMailRequest, TokenMessageResponse, TokenResponse, VerifyOtpRequest,
                VerifyOtpResponse,
            },
        },
        users::{
            self,
            types::{ChangeMailOrUsernameRequest, User, UserId},
        },
    },
};
use async_trait::async_trait;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Attaches the bearer token to subsequent calls.
    fn attach_bearer(&self, token: &SessionToken);

    /// Removes any attached bearer token.
    fn detach_bearer(&self);

    async fn issue_token(&self) -> Result<Exchange<TokenResponse>, ApiError>;

    async fn check_admin_access(
        &self,
        token: &SessionToken,
    ) -> Result<Exchange<AdminAccessResponse>, ApiError>;

    async fn user_info(&self, token: &SessionToken) -> Result<User, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<TokenMessageResponse, ApiError>;

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<VerifyOtpResponse, ApiError>;

    async fn resend_otp(
        &self,
        request: &ResendOtpRequest,
    ) -> Result<TokenMessageResponse, ApiError>;

    async fn reset_password_mail(
        &self,
        request: &ResetPasswordMailRequest,
    ) -> Result<MessageResponse, ApiError>;

    async fn reset_password_apply(
        &self,
        request: &ResetPasswordApplyRequest,
    ) -> Result<MessageResponse, ApiError>;

    async fn logout(&self) -> Result<MessageResponse, ApiError>;

    async fn update_avatar(&self, file: MultipartFile) -> Result<MessageResponse, ApiError>;

    async fn change_mail_or_username(
        &self,
        request: &ChangeMailOrUsernameRequest,
    ) -> Result<TokenMessageResponse, ApiError>;

    async fn enable_two_factor(&self) -> Result<TokenMessageResponse, ApiError>;

    async fn list_users(&self) -> Result<UserListResponse, ApiError>;

    async fn ban_user(&self, request: &BanUserRequest) -> Result<MessageResponse, ApiError>;

    async fn unban_user(&self, request: &UnbanUserRequest) -> Result<MessageResponse, ApiError>;

    async fn delete_user(&self, id: &UserId) -> Result<MessageResponse, ApiError>;

    async fn user_edit_info(&self, id: &UserId) -> Result<UserEditInfoResponse, ApiError>;
}

#[async_trait]
impl Backend for ApiClient {
    fn attach_bearer(&self, token: &SessionToken) {
        ApiClient::attach_bearer(self, token.as_secret());
    }

    fn detach_bearer(&self) {
        ApiClient::detach_bearer(self);
    }

    async fn issue_token(&self) -> Result<Exchange<TokenResponse>, ApiError> {
        auth::client::issue_token(self).await
    }

    async fn check_admin_access(
        &self,
        token: &SessionToken,
    ) -> Result<Exchange<AdminAccessResponse>, ApiError> {
        auth::client::check_admin_access(self, token).await
    }

    async fn user_info(&self, token: &SessionToken) -> Result<User, ApiError> {
        auth::client::user_info(self, token).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        auth::client::login(self, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<TokenMessageResponse, ApiError> {
        auth::client::register(self, request).await
    }

    async fn verify_otp(
        &self,
        request: &VerifyOtpRequest,
    ) -> Result<VerifyOtpResponse, ApiError> {
        auth::client::verify_otp(self, request).await
    }

    async fn resend_otp(
        &self,
        request: &ResendOtpRequest,
    ) -> Result<TokenMessageResponse, ApiError> {
        auth::client::resend_otp(self, request).await
    }

    async fn reset_password_mail(
        &self,
        request: &ResetPasswordMailRequest,
    ) -> Result<MessageResponse, ApiError> {
        auth::client::reset_password_mail(self, request).await
    }

    async fn reset_password_apply(
        &self,
        request: &ResetPasswordApplyRequest,
    ) -> Result<MessageResponse, ApiError> {
        auth::client::reset_password_apply(self, request).await
    }

    async fn logout(&self) -> Result<MessageResponse, ApiError> {
        auth::client::logout(self).await
    }

    async fn update_avatar(&self, file: MultipartFile) -> Result<MessageResponse, ApiError> {
        users::client::update_avatar(self, file).await
    }

    async fn change_mail_or_username(
        &self,
        request: &ChangeMailOrUsernameRequest,
    ) -> Result<TokenMessageResponse, ApiError> {
        users::client::change_mail_or_username(self, request).await
    }

    async fn enable_two_factor(&self) -> Result<TokenMessageResponse, ApiError> {
        users::client::enable_two_factor(self).await
    }

    async fn list_users(&self) -> Result<UserListResponse, ApiError> {
        admin::client::list_users(self).await
    }

    async fn ban_user(&self, request: &BanUserRequest) -> Result<MessageResponse, ApiError> {
        admin::client::ban_user(self, request).await
    }

    async fn unban_user(&self, request: &UnbanUserRequest) -> Result<MessageResponse, ApiError> {
        admin::client::unban_user(self, request).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<MessageResponse, ApiError> {
        admin::client::delete_user(self, id).await
    }

    async fn user_edit_info(&self, id: &UserId) -> Result<UserEditInfoResponse, ApiError> {
        admin::client::user_edit_info(self, id).await
    }
}
