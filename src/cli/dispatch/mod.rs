use crate::{
    cli::{
        actions::{Action, admin, auth, profile},
        commands::{
            admin as admin_cmd, api,
            auth::{self as auth_cmd, ARG_CODE, ARG_EMAIL, ARG_KIND, ARG_PASSWORD, ARG_TOKEN},
            profile as profile_cmd,
        },
        globals::GlobalArgs,
    },
    features::{auth::types::OtpKind, users::UserId},
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    required(matches, id).map(SecretString::from)
}

fn otp_kind(matches: &ArgMatches) -> Result<OtpKind> {
    let value = required(matches, ARG_KIND)?;
    OtpKind::from_query(&value).with_context(|| format!("unknown one-time code kind: {value}"))
}

fn user_id(matches: &ArgMatches) -> Result<UserId> {
    required(matches, admin_cmd::ARG_ID).map(|id| UserId::from(id.trim()))
}

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(api::ARG_API_URL)
        .cloned()
        .context("missing required argument: --api-url (or AUTHAPP_API_URL)")?;

    Ok(GlobalArgs::new(api_url)
        .with_cookie(matches.get_one::<String>(api::ARG_COOKIE).cloned())
        .with_timeout(matches.get_one::<u64>(api::ARG_TIMEOUT).copied())
        .with_export_cookie(matches.get_flag(api::ARG_EXPORT_COOKIE)))
}

/// Maps parsed arguments to an `Action`.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    let Some((name, sub)) = matches.subcommand() else {
        return Err(anyhow!("missing subcommand"));
    };

    let command = match name {
        auth_cmd::CMD_LOGIN => auth::Command::Login {
            email: required(sub, ARG_EMAIL)?,
            password: secret(sub, ARG_PASSWORD)?,
        },
        auth_cmd::CMD_REGISTER => auth::Command::Register {
            username: required(sub, auth_cmd::ARG_USERNAME)?,
            email: required(sub, ARG_EMAIL)?,
            password: secret(sub, ARG_PASSWORD)?,
        },
        auth_cmd::CMD_VERIFY_OTP => auth::Command::VerifyOtp {
            token: required(sub, ARG_TOKEN)?,
            kind: otp_kind(sub)?,
            code: secret(sub, ARG_CODE)?,
        },
        auth_cmd::CMD_RESEND_OTP => auth::Command::ResendOtp {
            token: required(sub, ARG_TOKEN)?,
            kind: otp_kind(sub)?,
        },
        auth_cmd::CMD_RESET_PASSWORD => auth::Command::ResetPassword {
            email: required(sub, ARG_EMAIL)?,
        },
        auth_cmd::CMD_NEW_PASSWORD => auth::Command::NewPassword {
            token: required(sub, ARG_TOKEN)?,
            password: secret(sub, ARG_PASSWORD)?,
            confirmation: secret(sub, auth_cmd::ARG_CONFIRM)?,
        },
        auth_cmd::CMD_LOGOUT => auth::Command::Logout,
        auth_cmd::CMD_WHOAMI => auth::Command::Whoami,
        auth_cmd::CMD_OPEN => auth::Command::Open {
            path: required(sub, auth_cmd::ARG_PATH)?,
        },
        profile_cmd::CMD_PROFILE => return Ok(Action::Profile(globals, profile_command(sub)?)),
        admin_cmd::CMD_ADMIN => return Ok(Action::Admin(globals, admin_command(sub)?)),
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(Action::Auth(globals, command))
}

fn profile_command(matches: &ArgMatches) -> Result<profile::Command> {
    let Some((name, sub)) = matches.subcommand() else {
        return Err(anyhow!("missing profile subcommand"));
    };

    let command = match name {
        profile_cmd::CMD_AVATAR => profile::Command::Avatar {
            file: PathBuf::from(required(sub, profile_cmd::ARG_FILE)?),
            content_type: sub.get_one::<String>(profile_cmd::ARG_CONTENT_TYPE).cloned(),
        },
        profile_cmd::CMD_USERNAME => {
            profile::Command::Username(required(sub, profile_cmd::ARG_VALUE)?)
        }
        profile_cmd::CMD_EMAIL => profile::Command::Email(required(sub, profile_cmd::ARG_VALUE)?),
        profile_cmd::CMD_PASSWORD => profile::Command::Password {
            current_email: required(sub, profile_cmd::ARG_CURRENT_EMAIL)?,
        },
        profile_cmd::CMD_TWO_FACTOR => profile::Command::TwoFactor,
        other => return Err(anyhow!("unknown profile subcommand: {other}")),
    };
    Ok(command)
}

fn admin_command(matches: &ArgMatches) -> Result<admin::Command> {
    let Some((name, sub)) = matches.subcommand() else {
        return Err(anyhow!("missing admin subcommand"));
    };

    let command = match name {
        admin_cmd::CMD_LIST => admin::Command::List,
        admin_cmd::CMD_SHOW => admin::Command::Show(user_id(sub)?),
        admin_cmd::CMD_BAN => admin::Command::Ban {
            id: user_id(sub)?,
            reason: required(sub, admin_cmd::ARG_REASON)?,
            expire: required(sub, admin_cmd::ARG_EXPIRE)?,
        },
        admin_cmd::CMD_UNBAN => admin::Command::Unban(user_id(sub)?),
        admin_cmd::CMD_TOGGLE_BAN => admin::Command::ToggleBan {
            id: user_id(sub)?,
            reason: required(sub, admin_cmd::ARG_REASON)?,
            expire: required(sub, admin_cmd::ARG_EXPIRE)?,
        },
        admin_cmd::CMD_DELETE => admin::Command::Delete(user_id(sub)?),
        other => return Err(anyhow!("unknown admin subcommand: {other}")),
    };
    Ok(command)
}
