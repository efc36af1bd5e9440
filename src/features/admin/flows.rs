//! Admin user management. Callers run the admin guard first; these flows only
//! rely on the attached bearer token. Any structured error is surfaced.

use crate::{
    app_lib::ApiError,
    features::{
        admin::types::{BanUserRequest, UnbanUserRequest},
        auth::types::MessageResponse,
        context::AppContext,
        outcome::{FlowOutcome, Notice, Surface, surface_error},
        users::types::{User, UserId},
    },
    routes::Route,
};
use tracing::info;

/// Ban duration used when none is given.
pub const DEFAULT_BAN_EXPIRE: &str = "1D";

fn mutation_outcome(operation: &str, result: Result<MessageResponse, ApiError>) -> FlowOutcome {
    match result {
        Ok(response) if response.success => FlowOutcome::notice(Notice::success(response.message)),
        Ok(_) => FlowOutcome::none(),
        Err(err) => FlowOutcome {
            notice: surface_error(operation, &err, Surface::Any),
            navigate: None,
        },
    }
}

/// Loads every account.
///
/// # Errors
/// Returns the outcome to show when the list cannot be loaded.
pub async fn list_users(ctx: &AppContext) -> Result<Vec<User>, FlowOutcome> {
    match ctx.backend().list_users().await {
        Ok(response) => Ok(response.users),
        Err(err) => Err(FlowOutcome {
            notice: surface_error("list_users", &err, Surface::Any),
            navigate: None,
        }),
    }
}

/// Loads one account for the edit page.
///
/// # Errors
/// Returns an outcome that sends the operator back to the user list.
pub async fn user_edit_info(ctx: &AppContext, id: &UserId) -> Result<User, FlowOutcome> {
    match ctx.backend().user_edit_info(id).await {
        Ok(response) => Ok(response.user),
        Err(err) => Err(FlowOutcome {
            notice: surface_error("user_edit_info", &err, Surface::Any),
            navigate: Some(Route::AdminUsers),
        }),
    }
}

pub async fn ban_user(ctx: &AppContext, id: &UserId, reason: &str, expire: &str) -> FlowOutcome {
    let request = BanUserRequest {
        user_id: id.clone(),
        reason: reason.trim().to_string(),
        expire: expire.trim().to_string(),
    };
    info!(user_id = %id, expire = %request.expire, "banning user");
    mutation_outcome("ban_user", ctx.backend().ban_user(&request).await)
}

pub async fn unban_user(ctx: &AppContext, id: &UserId) -> FlowOutcome {
    let request = UnbanUserRequest {
        user_id: id.clone(),
    };
    info!(user_id = %id, "unbanning user");
    mutation_outcome("unban_user", ctx.backend().unban_user(&request).await)
}

/// Bans an active account or lifts the ban of a banned one.
pub async fn toggle_ban(ctx: &AppContext, user: &User, reason: &str, expire: &str) -> FlowOutcome {
    if user.is_banned() {
        unban_user(ctx, &user.id).await
    } else {
        ban_user(ctx, &user.id, reason, expire).await
    }
}

pub async fn delete_user(ctx: &AppContext, id: &UserId) -> FlowOutcome {
    info!(user_id = %id, "deleting user");
    mutation_outcome("delete_user", ctx.backend().delete_user(id).await)
}
