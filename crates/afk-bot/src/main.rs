mod bootstrap_helpers;
mod startup_preflight;

use std::sync::Arc;

use afk_cli::{resolve_discord_token, validate_cli, Cli};
use afk_discord_runtime::{run_discord_responder, DiscordResponderRuntimeConfig};
use anyhow::Result;
use clap::Parser;

use crate::bootstrap_helpers::init_tracing;
use crate::startup_preflight::{execute_check_config, load_startup_responder, StartupError};

async fn run_cli(cli: Cli) -> Result<()> {
    validate_cli(&cli)?;
    if cli.check_config {
        return execute_check_config(&cli);
    }

    let Some(token) = resolve_discord_token(&cli) else {
        return Err(StartupError::ConfigMissing.into());
    };
    let responder = load_startup_responder(&cli)?;
    tracing::info!(
        token_len = token.len(),
        command_prefix = %cli.command_prefix,
        "starting discord responder"
    );
    run_discord_responder(DiscordResponderRuntimeConfig {
        token: token.to_string(),
        command_prefix: cli.command_prefix.clone(),
        responder: Arc::new(responder),
    })
    .await
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_cli(cli).await
}
