pub mod admin;
pub mod auth;
pub mod profile;
mod render;

// Internal "interpreter" for `Action`.
mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Auth(GlobalArgs, auth::Command),
    Profile(GlobalArgs, profile::Command),
    Admin(GlobalArgs, admin::Command),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails or the API reports a user-facing error.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
