use clap::{Arg, ArgAction, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_COOKIE: &str = "cookie";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_EXPORT_COOKIE: &str = "export-cookie";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .short('u')
                .long(ARG_API_URL)
                .help("Base URL of the account API, example: https://api.example.com")
                .env("AUTHAPP_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_COOKIE)
                .long(ARG_COOKIE)
                .help("Cookie header holding the session credential, example: refreshToken=...")
                .env("AUTHAPP_COOKIE")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds (default: 10)")
                .env("AUTHAPP_TIMEOUT_SECONDS")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..=300)),
        )
        .arg(
            Arg::new(ARG_EXPORT_COOKIE)
                .long(ARG_EXPORT_COOKIE)
                .help("Print the session cookie after the command, for reuse with --cookie")
                .global(true)
                .action(ArgAction::SetTrue),
        )
}
