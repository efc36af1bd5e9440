use clap::{Arg, Command};

pub const CMD_PROFILE: &str = "profile";
pub const CMD_AVATAR: &str = "avatar";
pub const CMD_USERNAME: &str = "username";
pub const CMD_EMAIL: &str = "email";
pub const CMD_PASSWORD: &str = "password";
pub const CMD_TWO_FACTOR: &str = "two-factor";

pub const ARG_FILE: &str = "file";
pub const ARG_CONTENT_TYPE: &str = "content-type";
pub const ARG_VALUE: &str = "value";
pub const ARG_CURRENT_EMAIL: &str = "current-email";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command.subcommand(
        Command::new(CMD_PROFILE)
            .about("Edit the signed-in account")
            .subcommand_required(true)
            .subcommand(
                Command::new(CMD_AVATAR)
                    .about("Upload a new avatar image (max 5 MB)")
                    .arg(Arg::new(ARG_FILE).help("Image file").required(true))
                    .arg(
                        Arg::new(ARG_CONTENT_TYPE)
                            .long(ARG_CONTENT_TYPE)
                            .help("Override the image type guessed from the file name"),
                    ),
            )
            .subcommand(
                Command::new(CMD_USERNAME)
                    .about("Change the username (confirmed by one-time code)")
                    .arg(Arg::new(ARG_VALUE).help("New username").required(true)),
            )
            .subcommand(
                Command::new(CMD_EMAIL)
                    .about("Change the email address (confirmed by one-time code)")
                    .arg(Arg::new(ARG_VALUE).help("New email address").required(true)),
            )
            .subcommand(
                Command::new(CMD_PASSWORD)
                    .about("Email a password reset link to the current address")
                    .arg(
                        Arg::new(ARG_CURRENT_EMAIL)
                            .help("Current account email address")
                            .required(true),
                    ),
            )
            .subcommand(
                Command::new(CMD_TWO_FACTOR).about("Enable two-factor login"),
            ),
    )
}
