use crate::cli::actions::{Action, admin, auth, profile};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point; every `Action` variant maps to one module.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Auth(globals, command) => auth::execute(&globals, command).await,
        Action::Profile(globals, command) => profile::execute(&globals, command).await,
        Action::Admin(globals, command) => admin::execute(&globals, command).await,
    }
}
