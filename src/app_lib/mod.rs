//! Shared client utilities for API access, configuration and errors.
//!
//! ## Ambient Credential
//!
//! The API issues its refresh credential as an `HttpOnly` cookie. The client
//! keeps it in a cookie jar seeded from configuration and never inspects it;
//! the only thing derived from it is the short-lived bearer token returned by
//! `/api/auth/get-token`.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids
//! duplicated request setup in feature code. Callers must still avoid logging
//! tokens, cookies or passwords.

pub mod api;
pub mod config;
pub mod errors;

pub use api::{ApiClient, Exchange, MultipartFile, path_segment};
pub use config::AppConfig;
pub use errors::ApiError;
