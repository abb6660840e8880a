//! Discord gateway runtime for the afk responder.
//!
//! Maps serenity channel and message events onto responder decisions and
//! renders command responses as Discord messages and embeds.

mod discord_runtime;

pub use discord_runtime::{
    responder_gateway_intents, run_discord_responder, DiscordResponderRuntimeConfig,
};
