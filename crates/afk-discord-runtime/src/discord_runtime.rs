//! Discord gateway event handling for the afk responder.

use std::sync::Arc;

use afk_channel_match::ConversationSpace;
use afk_responder::{
    execute_responder_command, parse_responder_command, AutoResponder, CommandContext,
    CommandReply, InboundMessage, ResponderCommand,
};
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::Utc;
use serenity::builder::CreateMessage;
use serenity::client::{Client, Context, EventHandler};
use serenity::model::channel::{GuildChannel, Message};
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::id::{ChannelId, RoleId};
use serenity::model::Permissions;

mod discord_notice_sender;
mod discord_render_helpers;
mod discord_space_resolver;

use discord_notice_sender::DiscordNoticeSender;
use discord_render_helpers::{render_panel_embed, truncate_for_discord};
use discord_space_resolver::resolve_space;

#[derive(Clone)]
/// Runtime configuration for the Discord responder gateway client.
pub struct DiscordResponderRuntimeConfig {
    pub token: String,
    pub command_prefix: String,
    pub responder: Arc<AutoResponder>,
}

pub fn responder_gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
}

pub async fn run_discord_responder(config: DiscordResponderRuntimeConfig) -> Result<()> {
    let handler = ResponderEventHandler {
        responder: config.responder,
        command_prefix: config.command_prefix,
    };
    let mut client = Client::builder(&config.token, responder_gateway_intents())
        .event_handler(handler)
        .await
        .context("failed to build discord client")?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received, closing discord shards");
            shard_manager.shutdown_all().await;
        }
    });

    client
        .start()
        .await
        .context("discord gateway client stopped with an error")
}

struct ResponderEventHandler {
    responder: Arc<AutoResponder>,
    command_prefix: String,
}

#[async_trait]
impl EventHandler for ResponderEventHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        let snapshot = self.responder.snapshot(Utc::now());
        let policy = self.responder.policy();
        let monitor = self.responder.monitor_config();
        tracing::info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            timezone = policy.timezone().name(),
            window = %policy.window_summary().replace('\n', " "),
            unavailable = snapshot.unavailable,
            status = %snapshot.status_message,
            "discord responder ready"
        );
        tracing::info!(
            categories = monitor.categories.len(),
            channels = monitor.channels.len(),
            monitor_forums = monitor.monitor_forums,
            forums = monitor.forums.len(),
            empty_forum_names = self.responder.matcher().empty_forum_names().as_str(),
            replied = self.responder.replied_count(),
            "monitoring rules loaded"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let space = match resolve_space(&ctx, msg.guild_id, msg.channel_id).await {
            Ok(space) => space,
            Err(error) => {
                tracing::warn!(
                    channel_id = %msg.channel_id,
                    error = %format!("{error:#}"),
                    "failed to resolve message channel"
                );
                return;
            }
        };

        if let Some(space) = &space {
            let inbound = InboundMessage {
                space: space.clone(),
                author_name: msg.author.name.clone(),
                author_is_bot: msg.author.bot,
            };
            let sender = DiscordNoticeSender::new(ctx.http.clone());
            let decision = self
                .responder
                .handle_message(&inbound, Utc::now(), &sender)
                .await;
            tracing::debug!(
                space_id = %space.id,
                author = %inbound.author_name,
                reason_code = decision.reason_code(),
                "message handled"
            );
        }

        // Commands still answer where no conversation space resolves.
        if let Some(command) = parse_responder_command(&msg.content, &self.command_prefix) {
            self.dispatch_command(&ctx, &msg, space.as_ref(), command)
                .await;
        }
    }

    async fn thread_create(&self, ctx: Context, thread: GuildChannel) {
        match resolve_space(&ctx, Some(thread.guild_id), thread.id).await {
            Ok(Some(space)) if space.is_forum_thread() => {
                let evaluation = self.responder.evaluate_space(&space);
                tracing::info!(
                    space_id = %space.id,
                    space_name = %space.name,
                    forum = space.parent().map(|parent| parent.name.as_str()),
                    reason_code = evaluation.reason_code(),
                    "forum thread created"
                );
            }
            Ok(Some(space)) => {
                tracing::debug!(
                    space_id = %space.id,
                    space_name = %space.name,
                    space_kind = space.kind_label(),
                    "thread created"
                );
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    channel_id = %thread.id,
                    error = %format!("{error:#}"),
                    "failed to resolve created thread"
                );
            }
        }
    }
}

impl ResponderEventHandler {
    async fn dispatch_command(
        &self,
        ctx: &Context,
        msg: &Message,
        space: Option<&ConversationSpace>,
        command: ResponderCommand,
    ) {
        let invoker_is_admin = command.requires_admin() && invoker_is_admin(ctx, msg).await;
        tracing::info!(
            command = command.name(),
            author = %msg.author.name,
            space_id = space.map(|space| space.id.get()),
            invoker_is_admin,
            "responder command received"
        );
        let response = execute_responder_command(
            &self.responder,
            command,
            &CommandContext {
                space,
                invoker_is_admin,
                now: Utc::now(),
                prefix: &self.command_prefix,
            },
        );
        for reply in response.replies {
            send_command_reply(ctx, msg.channel_id, reply).await;
        }
    }
}

async fn send_command_reply(ctx: &Context, channel_id: ChannelId, reply: CommandReply) {
    let result = match reply {
        CommandReply::Text(text) => channel_id.say(ctx, truncate_for_discord(&text)).await,
        CommandReply::Panel(panel) => {
            channel_id
                .send_message(
                    ctx,
                    CreateMessage::new().embed(render_panel_embed(&panel)),
                )
                .await
        }
    };
    if let Err(error) = result {
        tracing::warn!(
            channel_id = %channel_id,
            error = %error,
            "failed to send command reply"
        );
    }
}

/// Guild owner, or any held role (including `@everyone`) granting administrator.
async fn invoker_is_admin(ctx: &Context, msg: &Message) -> bool {
    let Some(guild_id) = msg.guild_id else {
        return false;
    };
    let guild = match guild_id.to_partial_guild(ctx).await {
        Ok(guild) => guild,
        Err(error) => {
            tracing::warn!(guild_id = %guild_id, error = %error, "failed to fetch guild");
            return false;
        }
    };
    if guild.owner_id == msg.author.id {
        return true;
    }
    let member = match guild_id.member(ctx, msg.author.id).await {
        Ok(member) => member,
        Err(error) => {
            tracing::warn!(guild_id = %guild_id, error = %error, "failed to fetch member");
            return false;
        }
    };
    let everyone = RoleId::new(guild_id.get());
    let held = member
        .roles
        .iter()
        .copied()
        .chain(std::iter::once(everyone))
        .filter_map(|role_id| guild.roles.get(&role_id))
        .map(|role| role.permissions);
    roles_grant_administrator(held)
}

fn roles_grant_administrator(permissions: impl IntoIterator<Item = Permissions>) -> bool {
    permissions
        .into_iter()
        .any(|permission| permission.contains(Permissions::ADMINISTRATOR))
}
