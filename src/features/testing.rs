//! Scripted in-memory backend for unit tests.

use crate::{
    app_lib::{ApiError, Exchange, MultipartFile},
    features::{
        admin::types::{BanUserRequest, UnbanUserRequest, UserEditInfoResponse, UserListResponse},
        auth::{
            token::SessionToken,
            types::{
                AdminAccessResponse, LoginRequest, LoginResponse, MessageResponse,
                RegisterRequest, ResendOtpRequest, ResetPasswordApplyRequest,
                ResetPasswordMailRequest, TokenMessageResponse, TokenResponse, VerifyOtpRequest,
                VerifyOtpResponse,
            },
        },
        backend::Backend,
        users::types::{ChangeMailOrUsernameRequest, Role, User, UserId},
    },
};
use async_trait::async_trait;
use std::{collections::VecDeque, sync::Mutex};

type Reply<T> = Result<T, ApiError>;

/// Queue of replies; the last reply repeats once the queue is drained.
struct Script<T>(Mutex<VecDeque<Reply<T>>>);

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }
}

impl<T: Clone> Script<T> {
    fn push(&self, reply: Reply<T>) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push_back(reply);
        }
    }

    fn next(&self, name: &str) -> Reply<T> {
        let Ok(mut queue) = self.0.lock() else {
            return Err(ApiError::Config("script lock poisoned".to_string()));
        };
        if queue.len() > 1 {
            if let Some(reply) = queue.pop_front() {
                return reply;
            }
        }
        queue
            .front()
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Config(format!("unscripted call: {name}"))))
    }
}

pub(crate) fn http_error(status: u16, message: Option<&str>) -> ApiError {
    ApiError::Http {
        status,
        message: message.map(str::to_string),
        code: None,
    }
}

pub(crate) fn sample_user(id: &str, role: Role) -> User {
    User {
        id: UserId::from(id),
        username: format!("user-{id}"),
        email: format!("{id}@example.com"),
        role,
        is_verified: true,
        is_two_factor_enabled: false,
        avatar: None,
        ban_status: None,
    }
}

pub(crate) fn ok_message(message: &str) -> Reply<MessageResponse> {
    Ok(MessageResponse {
        success: true,
        message: message.to_string(),
    })
}

pub(crate) fn ok_token_message(message: &str, token: Option<&str>) -> Reply<TokenMessageResponse> {
    Ok(TokenMessageResponse {
        success: true,
        message: message.to_string(),
        token: token.map(str::to_string),
    })
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    token: Script<Exchange<TokenResponse>>,
    admin_access: Script<Exchange<AdminAccessResponse>>,
    user_info: Script<User>,
    login: Script<LoginResponse>,
    register: Script<TokenMessageResponse>,
    verify_otp: Script<VerifyOtpResponse>,
    resend_otp: Script<TokenMessageResponse>,
    reset_mail: Script<MessageResponse>,
    reset_apply: Script<MessageResponse>,
    logout: Script<MessageResponse>,
    avatar: Script<MessageResponse>,
    change: Script<TokenMessageResponse>,
    two_factor: Script<TokenMessageResponse>,
    list_users: Script<UserListResponse>,
    ban: Script<MessageResponse>,
    unban: Script<MessageResponse>,
    delete: Script<MessageResponse>,
    edit_info: Script<UserEditInfoResponse>,
    calls: Mutex<Vec<String>>,
    bearer: Mutex<Option<String>>,
}

macro_rules! scripted {
    ($($method:ident => $field:ident : $ty:ty),* $(,)?) => {
        $(
            #[must_use]
            pub(crate) fn $method(self, reply: Reply<$ty>) -> Self {
                self.$field.push(reply);
                self
            }
        )*
    };
}

impl FakeBackend {
    scripted! {
        with_token => token: Exchange<TokenResponse>,
        with_admin_access => admin_access: Exchange<AdminAccessResponse>,
        with_user_info => user_info: User,
        with_login => login: LoginResponse,
        with_register => register: TokenMessageResponse,
        with_verify_otp => verify_otp: VerifyOtpResponse,
        with_resend_otp => resend_otp: TokenMessageResponse,
        with_reset_mail => reset_mail: MessageResponse,
        with_reset_apply => reset_apply: MessageResponse,
        with_logout => logout: MessageResponse,
        with_avatar => avatar: MessageResponse,
        with_change => change: TokenMessageResponse,
        with_two_factor => two_factor: TokenMessageResponse,
        with_list_users => list_users: UserListResponse,
        with_ban => ban: MessageResponse,
        with_unban => unban: MessageResponse,
        with_delete => delete: MessageResponse,
        with_edit_info => edit_info: UserEditInfoResponse,
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub(crate) fn bearer(&self) -> Option<String> {
        self.bearer.lock().ok().and_then(|bearer| bearer.clone())
    }

    fn record(&self, call: impl Into<String>) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.into());
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn attach_bearer(&self, token: &SessionToken) {
        if let Ok(mut bearer) = self.bearer.lock() {
            *bearer = Some(token.expose().to_string());
        }
    }

    fn detach_bearer(&self) {
        if let Ok(mut bearer) = self.bearer.lock() {
            *bearer = None;
        }
    }

    async fn issue_token(&self) -> Reply<Exchange<TokenResponse>> {
        self.record("issue_token");
        self.token.next("issue_token")
    }

    async fn check_admin_access(
        &self,
        token: &SessionToken,
    ) -> Reply<Exchange<AdminAccessResponse>> {
        self.record(format!("check_admin_access:{}", token.expose()));
        self.admin_access.next("check_admin_access")
    }

    async fn user_info(&self, token: &SessionToken) -> Reply<User> {
        self.record(format!("user_info:{}", token.expose()));
        self.user_info.next("user_info")
    }

    async fn login(&self, _request: &LoginRequest) -> Reply<LoginResponse> {
        self.record("login");
        self.login.next("login")
    }

    async fn register(&self, _request: &RegisterRequest) -> Reply<TokenMessageResponse> {
        self.record("register");
        self.register.next("register")
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Reply<VerifyOtpResponse> {
        self.record(format!("verify_otp:{}", request.otp_type.query_value()));
        self.verify_otp.next("verify_otp")
    }

    async fn resend_otp(&self, request: &ResendOtpRequest) -> Reply<TokenMessageResponse> {
        self.record(format!("resend_otp:{}", request.otp_type.query_value()));
        self.resend_otp.next("resend_otp")
    }

    async fn reset_password_mail(
        &self,
        request: &ResetPasswordMailRequest,
    ) -> Reply<MessageResponse> {
        self.record(format!("reset_password_mail:{}", request.email));
        self.reset_mail.next("reset_password_mail")
    }

    async fn reset_password_apply(
        &self,
        _request: &ResetPasswordApplyRequest,
    ) -> Reply<MessageResponse> {
        self.record("reset_password_apply");
        self.reset_apply.next("reset_password_apply")
    }

    async fn logout(&self) -> Reply<MessageResponse> {
        self.record("logout");
        self.logout.next("logout")
    }

    async fn update_avatar(&self, file: MultipartFile) -> Reply<MessageResponse> {
        self.record(format!("update_avatar:{}", file.file_name));
        self.avatar.next("update_avatar")
    }

    async fn change_mail_or_username(
        &self,
        _request: &ChangeMailOrUsernameRequest,
    ) -> Reply<TokenMessageResponse> {
        self.record("change_mail_or_username");
        self.change.next("change_mail_or_username")
    }

    async fn enable_two_factor(&self) -> Reply<TokenMessageResponse> {
        self.record("enable_two_factor");
        self.two_factor.next("enable_two_factor")
    }

    async fn list_users(&self) -> Reply<UserListResponse> {
        self.record("list_users");
        self.list_users.next("list_users")
    }

    async fn ban_user(&self, request: &BanUserRequest) -> Reply<MessageResponse> {
        self.record(format!("ban_user:{}", request.user_id));
        self.ban.next("ban_user")
    }

    async fn unban_user(&self, request: &UnbanUserRequest) -> Reply<MessageResponse> {
        self.record(format!("unban_user:{}", request.user_id));
        self.unban.next("unban_user")
    }

    async fn delete_user(&self, id: &UserId) -> Reply<MessageResponse> {
        self.record(format!("delete_user:{id}"));
        self.delete.next("delete_user")
    }

    async fn user_edit_info(&self, id: &UserId) -> Reply<UserEditInfoResponse> {
        self.record(format!("user_edit_info:{id}"));
        self.edit_info.next("user_edit_info")
    }
}
