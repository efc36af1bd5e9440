use crate::{
    cli::{actions::render, globals::GlobalArgs},
    features::{
        AppContext,
        admin::flows,
        auth::guards,
        users::UserId,
    },
    routes::Route,
};
use anyhow::Result;
use tracing::{Instrument, info_span};

#[derive(Debug)]
pub enum Command {
    List,
    Show(UserId),
    Ban {
        id: UserId,
        reason: String,
        expire: String,
    },
    Unban(UserId),
    ToggleBan {
        id: UserId,
        reason: String,
        expire: String,
    },
    Delete(UserId),
}

/// # Errors
/// Returns an error if the caller is not an operator or the flow reports an error.
pub async fn execute(globals: &GlobalArgs, command: Command) -> Result<()> {
    let session = globals.connect()?;
    let ctx = &session.ctx;
    let span = info_span!("admin");

    let result = async {
        let decision = guards::guard_route(ctx, &Route::AdminUsers).await;
        render::require_render(&decision)?;
        run(ctx, command).await
    }
    .instrument(span)
    .await;

    session.finish();
    result
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::List => match flows::list_users(ctx).await {
            Ok(users) => {
                render::users(&users);
                Ok(())
            }
            Err(outcome) => render::outcome(outcome),
        },
        Command::Show(id) => match flows::user_edit_info(ctx, &id).await {
            Ok(user) => {
                render::user(&user);
                Ok(())
            }
            Err(outcome) => render::outcome(outcome),
        },
        Command::Ban { id, reason, expire } => {
            render::outcome(flows::ban_user(ctx, &id, &reason, &expire).await)
        }
        Command::Unban(id) => render::outcome(flows::unban_user(ctx, &id).await),
        Command::ToggleBan { id, reason, expire } => match flows::user_edit_info(ctx, &id).await {
            Ok(user) => render::outcome(flows::toggle_ban(ctx, &user, &reason, &expire).await),
            Err(outcome) => render::outcome(outcome),
        },
        Command::Delete(id) => render::outcome(flows::delete_user(ctx, &id).await),
    }
}
