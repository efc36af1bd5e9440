use clap::{Arg, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            if parsed <= 4 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("AUTHAPP_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_accepts_names_and_numbers() {
        for (value, expected) in [("error", 0), ("WARN", 1), ("3", 3), ("trace", 4)] {
            temp_env::with_vars([("AUTHAPP_LOG_LEVEL", Some(value))], || {
                // env defaults are captured when the arg is built
                let matches = with_args(Command::new("t")).get_matches_from(vec!["t"]);
                assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(expected));
            });
        }
    }

    #[test]
    fn test_validator_rejects_unknown_level() {
        temp_env::with_vars([("AUTHAPP_LOG_LEVEL", Some("loud"))], || {
            let result = with_args(Command::new("t")).try_get_matches_from(vec!["t"]);
            assert!(result.is_err());
        });
    }
}
