use afk_cli::Cli;
use afk_responder::{
    build_auto_responder, collect_responder_config_warnings, load_responder_config,
    render_responder_summary, AutoResponder, ResponderConfigFile,
};
use anyhow::Result;
use chrono::Utc;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error("missing Discord token: pass --discord-token or set DISCORD_TOKEN")]
    ConfigMissing,
}

fn load_checked_config(cli: &Cli) -> Result<(ResponderConfigFile, Vec<String>)> {
    let config = load_responder_config(&cli.config)?;
    let warnings = collect_responder_config_warnings(&config);
    Ok((config, warnings))
}

pub(crate) fn load_startup_responder(cli: &Cli) -> Result<AutoResponder> {
    let (config, warnings) = load_checked_config(cli)?;
    for warning in &warnings {
        tracing::warn!(config = %cli.config.display(), "{warning}");
    }
    build_auto_responder(&config)
}

pub(crate) fn execute_check_config(cli: &Cli) -> Result<()> {
    let (config, warnings) = load_checked_config(cli)?;
    let responder = build_auto_responder(&config)?;
    let now = Utc::now();

    println!("config: {}", cli.config.display());
    println!("config_exists: {}", cli.config.exists());
    println!("command_prefix: {}", cli.command_prefix);
    println!("{}", render_responder_summary(&responder, now));
    if warnings.is_empty() {
        println!("warnings: none");
    } else {
        println!("warnings:");
        for warning in &warnings {
            println!("- {warning}");
        }
    }
    println!("notice preview:");
    println!("{}", responder.render_notice(now));
    Ok(())
}
