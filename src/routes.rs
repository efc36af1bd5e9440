//! Application routes, their guard class, and path parsing.
//!
//! Routes are the navigation targets produced by flows and the inputs to
//! route evaluation. `/auth/*` pages are public, `/admin/*` pages need an
//! operator session, everything else needs a session.

use crate::{app_lib::path_segment, features::auth::types::OtpKind};
use percent_encoding::percent_decode_str;
use std::fmt;
use url::{Url, form_urlencoded};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    VerifyOtp { token: String, kind: OtpKind },
    EmailSentSuccess,
    ResetPassword,
    NewPassword { token: Option<String> },
    AdminUsers,
    AdminUserUpdate { id: String },
}

/// Which session check a route needs before it may render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardClass {
    Public,
    Session,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteError {
    NotFound(String),
    /// The page exists but its query is unusable; the page redirects instead.
    InvalidQuery { redirect: Box<Route> },
}

impl fmt::Display for RouteError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::NotFound(path) => write!(formatter, "Unknown route: {path}"),
            RouteError::InvalidQuery { redirect } => {
                write!(formatter, "Invalid route query, redirecting to {redirect}")
            }
        }
    }
}

impl std::error::Error for RouteError {}

impl Route {
    #[must_use]
    pub fn guard(&self) -> GuardClass {
        match self {
            Route::Home => GuardClass::Session,
            Route::AdminUsers | Route::AdminUserUpdate { .. } => GuardClass::Admin,
            Route::Login
            | Route::Register
            | Route::VerifyOtp { .. }
            | Route::EmailSentSuccess
            | Route::ResetPassword
            | Route::NewPassword { .. } => GuardClass::Public,
        }
    }

    #[must_use]
    pub fn verify_otp(token: &str, kind: OtpKind) -> Self {
        Route::VerifyOtp {
            token: token.to_string(),
            kind,
        }
    }

    /// Path including the query string.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/auth/login".to_string(),
            Route::Register => "/auth/register".to_string(),
            Route::VerifyOtp { token, kind } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("token", token)
                    .append_pair("otpType", kind.query_value())
                    .finish();
                format!("/auth/verify-otp?{query}")
            }
            Route::EmailSentSuccess => "/auth/email-sent-success".to_string(),
            Route::ResetPassword => "/auth/reset-password".to_string(),
            Route::NewPassword { token: None } => "/auth/new-password".to_string(),
            Route::NewPassword { token: Some(token) } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("token", token)
                    .finish();
                format!("/auth/new-password?{query}")
            }
            Route::AdminUsers => "/admin/users".to_string(),
            Route::AdminUserUpdate { id } => {
                format!("/admin/users/update/{}", path_segment(id))
            }
        }
    }

    /// Parses an application path such as `/auth/verify-otp?token=..&otpType=..`.
    ///
    /// # Errors
    /// Returns `RouteError::NotFound` for unknown paths and
    /// `RouteError::InvalidQuery` when the verify-OTP page lacks a token or a
    /// known kind.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let raw = raw.trim();
        let url = Url::parse("http://app.local")
            .and_then(|base| base.join(raw))
            .map_err(|_| RouteError::NotFound(raw.to_string()))?;

        let query = |key: &str| {
            url.query_pairs()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.trim().is_empty())
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["auth", "login"] => Ok(Route::Login),
            ["auth", "register"] => Ok(Route::Register),
            ["auth", "verify-otp"] => {
                let token = query("token");
                let kind = query("otpType").and_then(|kind| OtpKind::from_query(&kind));
                match (token, kind) {
                    (Some(token), Some(kind)) => Ok(Route::VerifyOtp { token, kind }),
                    _ => Err(RouteError::InvalidQuery {
                        redirect: Box::new(Route::Home),
                    }),
                }
            }
            ["auth", "email-sent-success"] => Ok(Route::EmailSentSuccess),
            ["auth", "reset-password"] => Ok(Route::ResetPassword),
            ["auth", "new-password"] => Ok(Route::NewPassword {
                token: query("token"),
            }),
            ["admin"] | ["admin", "users"] => Ok(Route::AdminUsers),
            ["admin", "users", "update", id] => {
                let id = percent_decode_str(id).decode_utf8_lossy().into_owned();
                Ok(Route::AdminUserUpdate { id })
            }
            _ => Err(RouteError::NotFound(raw.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.path())
    }
}
