//! Profile management for the signed-in user.

pub mod client;
pub mod flows;
pub mod types;

pub use types::{Role, User, UserId};
