use crate::features::auth::types::OtpKind;
use clap::{Arg, Command, builder::PossibleValuesParser};

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_VERIFY_OTP: &str = "verify-otp";
pub const CMD_RESEND_OTP: &str = "resend-otp";
pub const CMD_RESET_PASSWORD: &str = "reset-password";
pub const CMD_NEW_PASSWORD: &str = "new-password";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_OPEN: &str = "open";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM: &str = "confirm";
pub const ARG_USERNAME: &str = "username";
pub const ARG_TOKEN: &str = "token";
pub const ARG_KIND: &str = "kind";
pub const ARG_CODE: &str = "code";
pub const ARG_PATH: &str = "path";

fn kind_parser() -> PossibleValuesParser {
    PossibleValuesParser::new(OtpKind::ALL.map(OtpKind::query_value))
}

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Account email address")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("AUTHAPP_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn token_arg(help: &'static str) -> Arg {
    Arg::new(ARG_TOKEN)
        .short('t')
        .long(ARG_TOKEN)
        .help(help)
        .required(true)
}

fn kind_arg() -> Arg {
    Arg::new(ARG_KIND)
        .short('k')
        .long(ARG_KIND)
        .help("One-time code kind")
        .required(true)
        .value_parser(kind_parser())
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in with email and password")
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .short('n')
                        .long(ARG_USERNAME)
                        .help("Username, at least 3 characters")
                        .required(true),
                )
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new(CMD_VERIFY_OTP)
                .about("Submit a one-time code")
                .arg(token_arg("Verification token from the previous step"))
                .arg(kind_arg())
                .arg(
                    Arg::new(ARG_CODE)
                        .short('c')
                        .long(ARG_CODE)
                        .help("Six character code received by email")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_RESEND_OTP)
                .about("Send the one-time code again")
                .arg(token_arg("Verification token from the previous step"))
                .arg(kind_arg()),
        )
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Email a password reset link")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new(CMD_NEW_PASSWORD)
                .about("Set a new password using the emailed token")
                .arg(token_arg("Token from the reset link"))
                .arg(password_arg())
                .arg(
                    Arg::new(ARG_CONFIRM)
                        .long(ARG_CONFIRM)
                        .help("Repeat the new password")
                        .env("AUTHAPP_PASSWORD_CONFIRM")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("End the current session"))
        .subcommand(Command::new(CMD_WHOAMI).about("Show the signed-in user"))
        .subcommand(
            Command::new(CMD_OPEN)
                .about("Evaluate an application route and show its page")
                .arg(
                    Arg::new(ARG_PATH)
                        .help("Application path, example: /admin/users")
                        .required(true),
                ),
        )
}
