use std::path::PathBuf;

use clap::Parser;

fn parse_command_prefix(value: &str) -> Result<String, String> {
    if value.is_empty() {
        return Err("command prefix must not be empty".to_string());
    }
    if value.chars().any(char::is_whitespace) {
        return Err("command prefix must not contain whitespace".to_string());
    }
    Ok(value.to_string())
}

#[derive(Debug, Parser)]
#[command(
    name = "afk-bot",
    about = "Discord auto-responder that replies once per channel while the operator is away",
    version
)]
pub struct Cli {
    #[arg(
        long = "discord-token",
        env = "DISCORD_TOKEN",
        hide_env_values = true,
        help = "Discord bot token used to connect to the gateway"
    )]
    pub discord_token: Option<String>,

    #[arg(
        long,
        env = "AFK_CONFIG",
        default_value = ".afk/responder.json",
        help = "Responder config file (JSON). A missing file means built-in defaults"
    )]
    pub config: PathBuf,

    #[arg(
        long = "command-prefix",
        env = "AFK_COMMAND_PREFIX",
        default_value = "!",
        value_parser = parse_command_prefix,
        help = "Prefix for responder commands such as !status"
    )]
    pub command_prefix: String,

    #[arg(
        long = "check-config",
        default_value_t = false,
        help = "Validate the config, print the startup summary and a notice preview, then exit without connecting"
    )]
    pub check_config: bool,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::Cli;

    #[test]
    fn unit_cli_parses_explicit_flags() {
        let cli = Cli::try_parse_from([
            "afk-bot",
            "--discord-token",
            "abc.def",
            "--config",
            "conf/responder.json",
            "--command-prefix",
            "?",
            "--check-config",
        ])
        .expect("parse cli");
        assert_eq!(cli.discord_token.as_deref(), Some("abc.def"));
        assert_eq!(cli.config, PathBuf::from("conf/responder.json"));
        assert_eq!(cli.command_prefix, "?");
        assert!(cli.check_config);
    }

    #[test]
    fn regression_cli_rejects_blank_or_spaced_prefix() {
        assert!(Cli::try_parse_from(["afk-bot", "--command-prefix", ""]).is_err());
        assert!(Cli::try_parse_from(["afk-bot", "--command-prefix", "a b"]).is_err());
    }
}
