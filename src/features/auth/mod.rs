//! Authentication: session bootstrap, client auth state, route guards and the
//! login/registration/OTP/password-reset flows.

pub mod bootstrap;
pub mod client;
pub mod flows;
pub mod guards;
pub mod state;
pub mod token;
pub mod types;
pub mod validate;

pub use bootstrap::{BootstrapOutcome, Guard, RouteDecision};
pub use state::AuthState;
pub use token::SessionToken;
