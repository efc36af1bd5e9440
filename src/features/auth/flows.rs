//! Login, registration, OTP and password-reset flows.
//!
//! Every flow validates its input locally, performs one API call and maps the
//! response to a `FlowOutcome`. Only errors whose status appears in the flow's
//! allowed list reach the user; the rest are logged.

use crate::{
    app_lib::ApiError,
    features::{
        auth::{
            token::SessionToken,
            types::{
                LoginRequest, OtpCode, OtpKind, RegisterRequest, ResendOtpRequest,
                ResetPasswordApplyRequest, ResetPasswordMailRequest, VerifyOtpRequest, non_empty,
            },
            validate::{self, ValidationError},
        },
        context::AppContext,
        outcome::{FlowOutcome, Notice, Surface, surface_error},
    },
    routes::Route,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

const LOGIN_STATUSES: &[u16] = &[400, 401, 403, 404];
const REGISTER_STATUSES: &[u16] = &[400];
const VERIFY_STATUSES: &[u16] = &[400, 401, 403, 404, 410, 423];
const RESEND_STATUSES: &[u16] = &[400, 401, 403, 404, 423];
const RESET_APPLY_STATUSES: &[u16] = &[400, 401, 404];
const LOGOUT_STATUSES: &[u16] = &[401];

fn rejected(err: &ValidationError) -> FlowOutcome {
    FlowOutcome::notice(Notice::error(err.to_string()))
}

fn failed(operation: &str, err: &ApiError, statuses: &[u16]) -> FlowOutcome {
    FlowOutcome {
        notice: surface_error(operation, err, Surface::Statuses(statuses)),
        navigate: None,
    }
}

fn success_notice(message: &str) -> Option<Notice> {
    let message = message.trim();
    (!message.is_empty()).then(|| Notice::success(message))
}

/// Stores an issued access token, loads the user and navigates home. When the
/// user cannot be loaded the token is dropped so state stays consistent.
async fn complete_sign_in(
    ctx: &AppContext,
    access_token: String,
    notice: Option<Notice>,
) -> FlowOutcome {
    let Some(token) = SessionToken::new(access_token) else {
        return FlowOutcome { notice, navigate: None };
    };

    match ctx.auth().establish(ctx.backend(), token).await {
        Ok(user) => {
            info!(user_id = %user.id, "signed in");
            FlowOutcome {
                notice,
                navigate: Some(Route::Home),
            }
        }
        Err(err) => {
            debug!(error = %err, "user info failed after sign-in");
            let message = match err.server_message() {
                Some(message) => message.to_string(),
                None if err.is_transport() => "Network error occurred".to_string(),
                None => "Some error occurred".to_string(),
            };
            FlowOutcome::notice(Notice::error(message))
        }
    }
}

/// Signs in with email and password. A pending two-factor challenge leaves the
/// auth state untouched and sends the caller to the OTP page.
pub async fn login(ctx: &AppContext, email: &str, password: SecretString) -> FlowOutcome {
    let checks = validate::email(email).and_then(|()| validate::password(password.expose_secret()));
    if let Err(err) = checks {
        return rejected(&err);
    }

    let request = LoginRequest {
        email: email.trim().to_string(),
        password,
    };
    let response = match ctx.backend().login(&request).await {
        Ok(response) => response,
        Err(err) => return failed("login", &err, LOGIN_STATUSES),
    };
    if !response.success {
        return FlowOutcome::none();
    }

    let notice = success_notice(&response.message);
    if let Some(challenge) = non_empty(response.token) {
        return FlowOutcome {
            notice,
            navigate: Some(Route::verify_otp(&challenge, OtpKind::TwoFactor)),
        };
    }
    match non_empty(response.access_token) {
        Some(access_token) => complete_sign_in(ctx, access_token, notice).await,
        None => FlowOutcome { notice, navigate: None },
    }
}

pub async fn register(
    ctx: &AppContext,
    username: &str,
    email: &str,
    password: SecretString,
) -> FlowOutcome {
    let checks = validate::username(username)
        .and_then(|()| validate::email(email))
        .and_then(|()| validate::password(password.expose_secret()));
    if let Err(err) = checks {
        return rejected(&err);
    }

    let request = RegisterRequest {
        username: username.trim().to_string(),
        email: email.trim().to_string(),
        password,
    };
    match ctx.backend().register(&request).await {
        Ok(response) if response.success => FlowOutcome {
            notice: success_notice(&response.message),
            navigate: non_empty(response.token)
                .map(|token| Route::verify_otp(&token, OtpKind::MailVerify)),
        },
        Ok(_) => FlowOutcome::none(),
        Err(err) => failed("register", &err, REGISTER_STATUSES),
    }
}

/// Submits a one-time code. The result code picks the next page.
pub async fn verify_otp(
    ctx: &AppContext,
    token: &str,
    kind: OtpKind,
    code: SecretString,
) -> FlowOutcome {
    if let Err(err) = validate::otp(code.expose_secret()) {
        return rejected(&err);
    }

    let request = VerifyOtpRequest {
        otp: SecretString::from(code.expose_secret().trim()),
        token: token.to_string(),
        otp_type: kind,
    };
    let response = match ctx.backend().verify_otp(&request).await {
        Ok(response) => response,
        Err(err) => {
            let mut outcome = failed("verify_otp", &err, VERIFY_STATUSES);
            let deleted = err
                .server_code()
                .is_some_and(|code| OtpCode::from(code.to_string()) == OtpCode::AccountDeleted);
            if deleted && err.status().is_some_and(|status| VERIFY_STATUSES.contains(&status)) {
                outcome.navigate = Some(Route::Register);
            }
            return outcome;
        }
    };
    if !response.success {
        return FlowOutcome::none();
    }

    let notice = success_notice(&response.message);
    match response.code {
        Some(OtpCode::LoginSuccess) => match non_empty(response.access_token) {
            Some(access_token) => complete_sign_in(ctx, access_token, notice).await,
            None => FlowOutcome {
                notice,
                navigate: Some(Route::Home),
            },
        },
        Some(OtpCode::EmailVerified) => FlowOutcome {
            notice,
            navigate: Some(Route::Login),
        },
        Some(OtpCode::TwoFactorEnabled) => {
            ctx.auth().refresh_user(ctx.backend()).await;
            FlowOutcome {
                notice,
                navigate: Some(Route::Home),
            }
        }
        code => {
            if matches!(kind, OtpKind::EmailChange | OtpKind::UsernameChange) {
                ctx.auth().refresh_user(ctx.backend()).await;
            }
            debug!(?code, "no navigation for otp result");
            FlowOutcome { notice, navigate: None }
        }
    }
}

/// Requests a fresh code and reopens the OTP page with the new token.
pub async fn resend_otp(ctx: &AppContext, token: &str, kind: OtpKind) -> FlowOutcome {
    let request = ResendOtpRequest {
        token: token.to_string(),
        otp_type: kind,
    };
    match ctx.backend().resend_otp(&request).await {
        Ok(response) if response.success => FlowOutcome {
            notice: success_notice(&response.message),
            navigate: non_empty(response.token).map(|token| Route::verify_otp(&token, kind)),
        },
        Ok(_) => FlowOutcome::none(),
        Err(err) => {
            let mut outcome = failed("resend_otp", &err, RESEND_STATUSES);
            outcome.navigate = match err.status() {
                Some(404) => Some(Route::Register),
                Some(423) => Some(Route::Home),
                _ => None,
            };
            outcome
        }
    }
}

/// Sends the reset link. Failures are only logged.
pub async fn reset_password_mail(ctx: &AppContext, email: &str) -> FlowOutcome {
    if let Err(err) = validate::email(email) {
        return rejected(&err);
    }

    let request = ResetPasswordMailRequest {
        email: email.trim().to_string(),
    };
    match ctx.backend().reset_password_mail(&request).await {
        Ok(response) if response.success => FlowOutcome::navigate(Route::EmailSentSuccess),
        Ok(_) => FlowOutcome::none(),
        Err(err) => failed("reset_password_mail", &err, &[]),
    }
}

/// Applies a new password using the emailed token. Without a token there is
/// nothing to apply and the caller is sent away.
pub async fn reset_password_apply(
    ctx: &AppContext,
    token: Option<&str>,
    password: SecretString,
    confirmation: SecretString,
) -> FlowOutcome {
    let away = if ctx.auth().user().is_some() {
        Route::Home
    } else {
        Route::Login
    };
    let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) else {
        return FlowOutcome::navigate(away);
    };
    if let Err(err) =
        validate::password_confirmation(password.expose_secret(), confirmation.expose_secret())
    {
        return rejected(&err);
    }

    let request = ResetPasswordApplyRequest {
        password,
        token: token.to_string(),
    };
    match ctx.backend().reset_password_apply(&request).await {
        Ok(response) if response.success => FlowOutcome {
            notice: success_notice(&response.message),
            navigate: Some(away),
        },
        Ok(_) => FlowOutcome::none(),
        Err(err) => failed("reset_password_apply", &err, RESET_APPLY_STATUSES),
    }
}

/// Ends the session. Local state is cleared whatever the server answers.
pub async fn logout(ctx: &AppContext) -> FlowOutcome {
    let result = ctx.backend().logout().await;
    ctx.auth().clear(ctx.backend());

    let outcome = FlowOutcome::navigate(Route::Login);
    match result {
        Ok(response) => match success_notice(&response.message) {
            Some(notice) if response.success => outcome.with_notice(notice),
            _ => outcome,
        },
        Err(err) => FlowOutcome {
            notice: surface_error("logout", &err, Surface::Statuses(LOGOUT_STATUSES)),
            ..outcome
        },
    }
}
