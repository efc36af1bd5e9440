//! Domain features (auth, users, admin) and the shared pieces flows need.
//! Flows take an `AppContext`, call the backend, update auth state and return
//! a `FlowOutcome`; they never print or navigate themselves.

pub mod admin;
pub mod auth;
pub mod backend;
pub mod context;
pub mod outcome;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::Backend;
pub use context::AppContext;
pub use outcome::{FlowOutcome, Notice, NoticeLevel};
