use crate::features::admin::flows::DEFAULT_BAN_EXPIRE;
use clap::{Arg, Command};

pub const CMD_ADMIN: &str = "admin";
pub const CMD_LIST: &str = "list";
pub const CMD_SHOW: &str = "show";
pub const CMD_BAN: &str = "ban";
pub const CMD_UNBAN: &str = "unban";
pub const CMD_TOGGLE_BAN: &str = "toggle-ban";
pub const CMD_DELETE: &str = "delete";

pub const ARG_ID: &str = "id";
pub const ARG_REASON: &str = "reason";
pub const ARG_EXPIRE: &str = "expire";

fn id_arg() -> Arg {
    Arg::new(ARG_ID).help("User id").required(true)
}

fn ban_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_REASON)
                .short('r')
                .long(ARG_REASON)
                .help("Reason shown to the user")
                .required(true),
        )
        .arg(
            Arg::new(ARG_EXPIRE)
                .long(ARG_EXPIRE)
                .help("Ban duration understood by the API")
                .default_value(DEFAULT_BAN_EXPIRE),
        )
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command.subcommand(
        Command::new(CMD_ADMIN)
            .about("Manage users (operators only)")
            .subcommand_required(true)
            .subcommand(Command::new(CMD_LIST).about("List all users"))
            .subcommand(
                Command::new(CMD_SHOW)
                    .about("Show one user")
                    .arg(id_arg()),
            )
            .subcommand(ban_args(
                Command::new(CMD_BAN).about("Ban a user").arg(id_arg()),
            ))
            .subcommand(
                Command::new(CMD_UNBAN)
                    .about("Lift a ban")
                    .arg(id_arg()),
            )
            .subcommand(ban_args(
                Command::new(CMD_TOGGLE_BAN)
                    .about("Ban an active user or unban a banned one")
                    .arg(id_arg()),
            ))
            .subcommand(
                Command::new(CMD_DELETE)
                    .about("Delete a user")
                    .arg(id_arg()),
            ),
    )
}
