use crate::{
    features::{
        FlowOutcome, NoticeLevel,
        auth::RouteDecision,
        users::User,
    },
    routes::Route,
};
use anyhow::{Result, bail};

/// Prints a flow outcome. An error notice becomes the command's error.
pub(super) fn outcome(outcome: FlowOutcome) -> Result<()> {
    let FlowOutcome { notice, navigate } = outcome;
    if let Some(route) = &navigate {
        println!("next: {route}");
    }
    match notice {
        Some(notice) if notice.level == NoticeLevel::Error => bail!(notice.message),
        Some(notice) => println!("{}", notice.message),
        None => {}
    }
    Ok(())
}

/// Prints a route decision.
pub(super) fn decision(decision: &RouteDecision) {
    match decision {
        RouteDecision::Render { .. } => println!("render"),
        RouteDecision::Redirect(route) => println!("redirect: {route}"),
    }
}

pub(super) fn user(user: &User) {
    println!("id:          {}", user.id);
    println!("username:    {}", user.username);
    println!("email:       {}", user.email);
    println!("role:        {}", user.role);
    println!("verified:    {}", user.is_verified);
    println!("two-factor:  {}", user.is_two_factor_enabled);
    if let Some(avatar) = &user.avatar {
        println!("avatar:      {}", avatar.url);
    }
    if let Some(ban) = user.ban_status.as_ref().filter(|ban| ban.is_banned) {
        println!(
            "banned:      {} (expires {})",
            ban.reason.as_deref().unwrap_or("no reason"),
            ban.expire.as_deref().unwrap_or("never")
        );
    }
}

pub(super) fn users(users: &[User]) {
    if users.is_empty() {
        println!("no users");
        return;
    }
    for user in users {
        println!(
            "{}\t{}\t{}\t{}\tverified={}\t2fa={}\tbanned={}",
            user.id,
            user.username,
            user.email,
            user.role,
            user.is_verified,
            user.is_two_factor_enabled,
            user.is_banned()
        );
    }
}

/// Fails with the redirect target when a guarded command may not run.
pub(super) fn require_render(decision: &RouteDecision) -> Result<()> {
    match decision {
        RouteDecision::Render { .. } => Ok(()),
        RouteDecision::Redirect(Route::Login) => bail!("not signed in (redirect: {})", Route::Login),
        RouteDecision::Redirect(route) => bail!("access denied (redirect: {route})"),
    }
}
