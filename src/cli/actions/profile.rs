use crate::{
    cli::{actions::render, globals::GlobalArgs},
    features::{AppContext, auth::guards, users::flows},
    routes::Route,
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{Instrument, info_span};

#[derive(Debug)]
pub enum Command {
    Avatar {
        file: PathBuf,
        content_type: Option<String>,
    },
    Username(String),
    Email(String),
    Password {
        current_email: String,
    },
    TwoFactor,
}

/// Runs the session guard so the bearer token and user are loaded.
async fn signed_in(ctx: &AppContext) -> Result<()> {
    let decision = guards::guard_route(ctx, &Route::Home).await;
    render::require_render(&decision)
}

/// # Errors
/// Returns an error if there is no session, the avatar file cannot be read,
/// or the flow reports an error.
pub async fn execute(globals: &GlobalArgs, command: Command) -> Result<()> {
    let session = globals.connect()?;
    let ctx = &session.ctx;
    let span = info_span!("profile");

    let result = async {
        signed_in(ctx).await?;
        match command {
            Command::Avatar { file, content_type } => {
                let bytes = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let file_name = file
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("avatar")
                    .to_string();
                let upload = flows::prepare_avatar(&file_name, content_type.as_deref(), bytes)?;
                render::outcome(flows::update_avatar(ctx, upload).await)
            }
            Command::Username(username) => {
                render::outcome(flows::change_username(ctx, &username).await)
            }
            Command::Email(email) => render::outcome(flows::change_email(ctx, &email).await),
            Command::Password { current_email } => {
                render::outcome(flows::request_password_reset(ctx, &current_email).await)
            }
            Command::TwoFactor => {
                if ctx.auth().user().is_some_and(|user| user.is_two_factor_enabled) {
                    println!("two-factor login is already enabled");
                }
                render::outcome(flows::enable_two_factor(ctx).await)
            }
        }
    }
    .instrument(span)
    .await;

    session.finish();
    result
}
