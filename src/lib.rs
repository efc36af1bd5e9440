//! # Authapp (account and session client)
//!
//! `authapp` is a client for the Auth App account API. It covers login,
//! registration, one-time-code verification, password reset, profile edits and
//! a small admin surface (list, ban, unban, delete users).
//!
//! ## Session Bootstrap
//!
//! Every protected route is evaluated before anything is rendered:
//!
//! 1. **Token:** the ambient cookie credential is exchanged for a short-lived
//!    bearer token at `/api/auth/get-token`.
//! 2. **Access (admin routes only):** the bearer token is checked against
//!    `/api/admin/has-access`.
//! 3. **Decision:** the route either renders or redirects to `/auth/login` or `/`.
//!
//! ## Client Auth State
//!
//! [`features::auth::state::AuthState`] holds the in-memory bearer token and the
//! mirrored user record. A user is present if and only if a token is present.
//! Tokens are never persisted and never logged.

pub mod app_lib;
pub mod cli;
pub mod features;
pub mod routes;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
