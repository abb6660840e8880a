use anyhow::{bail, Result};

use crate::Cli;

/// Returns the trimmed token, or `None` when absent or blank.
pub fn resolve_discord_token(cli: &Cli) -> Option<&str> {
    cli.discord_token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn validate_cli(cli: &Cli) -> Result<()> {
    if cli.config.is_dir() {
        bail!(
            "--config {} is a directory, expected a JSON file",
            cli.config.display()
        );
    }
    Ok(())
}
