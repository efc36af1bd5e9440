//! Operator-only user management.

pub mod client;
pub mod flows;
pub mod types;
