use crate::{
    cli::{actions::render, globals::GlobalArgs},
    features::{
        AppContext,
        admin::flows as admin_flows,
        auth::{RouteDecision, flows, guards, types::OtpKind},
        users::UserId,
    },
    routes::Route,
};
use anyhow::{Result, bail};
use secrecy::SecretString;
use tracing::{Instrument, info_span};

#[derive(Debug)]
pub enum Command {
    Login {
        email: String,
        password: SecretString,
    },
    Register {
        username: String,
        email: String,
        password: SecretString,
    },
    VerifyOtp {
        token: String,
        kind: OtpKind,
        code: SecretString,
    },
    ResendOtp {
        token: String,
        kind: OtpKind,
    },
    ResetPassword {
        email: String,
    },
    NewPassword {
        token: String,
        password: SecretString,
        confirmation: SecretString,
    },
    Logout,
    Whoami,
    Open {
        path: String,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Register { .. } => "register",
            Command::VerifyOtp { .. } => "verify-otp",
            Command::ResendOtp { .. } => "resend-otp",
            Command::ResetPassword { .. } => "reset-password",
            Command::NewPassword { .. } => "new-password",
            Command::Logout => "logout",
            Command::Whoami => "whoami",
            Command::Open { .. } => "open",
        }
    }
}

/// # Errors
/// Returns an error if the client cannot be built or the flow reports an error.
pub async fn execute(globals: &GlobalArgs, command: Command) -> Result<()> {
    let session = globals.connect()?;
    let ctx = &session.ctx;
    let span = info_span!("command", name = command.name());

    let result = async {
        match command {
            Command::Login { email, password } => {
                render::outcome(flows::login(ctx, &email, password).await)
            }
            Command::Register {
                username,
                email,
                password,
            } => render::outcome(flows::register(ctx, &username, &email, password).await),
            Command::VerifyOtp { token, kind, code } => {
                // A two-factor or profile code may need the current session.
                ctx.auth().initialize(ctx.backend()).await;
                render::outcome(flows::verify_otp(ctx, &token, kind, code).await)
            }
            Command::ResendOtp { token, kind } => {
                render::outcome(flows::resend_otp(ctx, &token, kind).await)
            }
            Command::ResetPassword { email } => {
                render::outcome(flows::reset_password_mail(ctx, &email).await)
            }
            Command::NewPassword {
                token,
                password,
                confirmation,
            } => {
                ctx.auth().initialize(ctx.backend()).await;
                render::outcome(
                    flows::reset_password_apply(ctx, Some(&token), password, confirmation).await,
                )
            }
            Command::Logout => {
                ctx.auth().initialize(ctx.backend()).await;
                render::outcome(flows::logout(ctx).await)
            }
            Command::Whoami => {
                ctx.auth().initialize(ctx.backend()).await;
                match ctx.auth().user() {
                    Some(user) => {
                        render::user(&user);
                        Ok(())
                    }
                    None => bail!("not signed in"),
                }
            }
            Command::Open { path } => open(ctx, &path).await,
        }
    }
    .instrument(span)
    .await;

    session.finish();
    result
}

/// Evaluates a route and prints the page data the route would render.
async fn open(ctx: &AppContext, path: &str) -> Result<()> {
    let decision = guards::guard_path(ctx, path).await?;
    render::decision(&decision);

    let RouteDecision::Render { .. } = decision else {
        return Ok(());
    };

    match Route::parse(path)? {
        Route::Home => {
            if let Some(user) = ctx.auth().user() {
                render::user(&user);
            }
        }
        Route::AdminUsers => match admin_flows::list_users(ctx).await {
            Ok(users) => render::users(&users),
            Err(outcome) => render::outcome(outcome)?,
        },
        Route::AdminUserUpdate { id } => {
            match admin_flows::user_edit_info(ctx, &UserId::from(id.as_str())).await {
                Ok(user) => render::user(&user),
                Err(outcome) => render::outcome(outcome)?,
            }
        }
        Route::NewPassword { token: None } => {
            let away = if ctx.auth().user().is_some() {
                Route::Home
            } else {
                Route::Login
            };
            println!("redirect: {away}");
        }
        _ => {}
    }
    Ok(())
}
