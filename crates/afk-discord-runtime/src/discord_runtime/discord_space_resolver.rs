//! Discord channel lookups reduced to conversation-space snapshots.

use afk_channel_match::{ConversationSpace, SpaceKind, MAX_SPACE_EVALUATIONS};
use anyhow::{Context as _, Result};
use serenity::cache::Cache;
use serenity::client::Context;
use serenity::model::channel::{Channel, ChannelType, GuildChannel};
use serenity::model::id::{ChannelId, GuildId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates how a Discord channel type participates in space resolution.
pub(super) enum DiscordChannelRole {
    Plain,
    Thread,
    Forum,
    Category,
    Unsupported,
}

pub(super) fn channel_role(kind: ChannelType) -> DiscordChannelRole {
    match kind {
        ChannelType::Text | ChannelType::News => DiscordChannelRole::Plain,
        ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread => {
            DiscordChannelRole::Thread
        }
        ChannelType::Forum => DiscordChannelRole::Forum,
        ChannelType::Category => DiscordChannelRole::Category,
        _ => DiscordChannelRole::Unsupported,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ChannelNode {
    pub id: u64,
    pub name: String,
    pub role: DiscordChannelRole,
    pub category: Option<String>,
}

/// Builds a space from a channel followed by its ancestors, nearest first.
/// Returns `None` when the first channel cannot host conversations.
pub(super) fn assemble_space(chain: &[ChannelNode]) -> Option<ConversationSpace> {
    let (node, ancestors) = chain.split_first()?;
    let kind = match node.role {
        DiscordChannelRole::Plain => SpaceKind::Plain,
        DiscordChannelRole::Thread => SpaceKind::Thread,
        DiscordChannelRole::Forum => SpaceKind::Forum,
        DiscordChannelRole::Category | DiscordChannelRole::Unsupported => return None,
    };
    let mut space = ConversationSpace {
        kind,
        ..ConversationSpace::plain(node.id, node.name.as_str())
    };
    if let Some(category) = &node.category {
        space = space.with_category(category.as_str());
    }
    if kind == SpaceKind::Thread {
        // An unusable parent leaves the thread orphaned, which never matches.
        space.parent = assemble_space(ancestors).map(Box::new);
    }
    Some(space)
}

/// Walks the channel and its ancestors, reading the gateway cache first and
/// falling back to REST. Channels outside a guild never form a space.
pub(super) async fn resolve_space(
    ctx: &Context,
    guild_id: Option<GuildId>,
    channel_id: ChannelId,
) -> Result<Option<ConversationSpace>> {
    let Some(guild_id) = guild_id else {
        return Ok(None);
    };
    let mut chain = Vec::new();
    let mut next = Some(channel_id);
    while let Some(id) = next.take() {
        if chain.len() >= MAX_SPACE_EVALUATIONS {
            break;
        }
        let Some(channel) = fetch_guild_channel(ctx, guild_id, id).await? else {
            break;
        };
        let role = channel_role(channel.kind);
        let mut node = ChannelNode {
            id: channel.id.get(),
            name: channel.name.clone(),
            role,
            category: None,
        };
        match role {
            DiscordChannelRole::Thread => next = channel.parent_id,
            DiscordChannelRole::Plain => {
                node.category = category_name(ctx, guild_id, channel.parent_id).await?;
            }
            _ => {}
        }
        chain.push(node);
    }
    Ok(assemble_space(&chain))
}

/// Guild channels and active threads known to the gateway cache.
pub(super) fn cached_guild_channel(
    cache: &Cache,
    guild_id: GuildId,
    id: ChannelId,
) -> Option<GuildChannel> {
    if let Some(channel) = cache.channel(id) {
        return Some(GuildChannel::clone(&channel));
    }
    let guild = cache.guild(guild_id)?;
    guild.threads.iter().find(|thread| thread.id == id).cloned()
}

async fn fetch_guild_channel(
    ctx: &Context,
    guild_id: GuildId,
    id: ChannelId,
) -> Result<Option<GuildChannel>> {
    if let Some(channel) = cached_guild_channel(&ctx.cache, guild_id, id) {
        return Ok(Some(channel));
    }
    tracing::debug!(channel_id = %id, "channel not cached, fetching over http");
    let channel = id
        .to_channel(&ctx.http)
        .await
        .with_context(|| format!("failed to fetch discord channel {id}"))?;
    Ok(match channel {
        Channel::Guild(channel) => Some(channel),
        _ => None,
    })
}

async fn category_name(
    ctx: &Context,
    guild_id: GuildId,
    parent_id: Option<ChannelId>,
) -> Result<Option<String>> {
    let Some(parent_id) = parent_id else {
        return Ok(None);
    };
    let parent = fetch_guild_channel(ctx, guild_id, parent_id).await?;
    Ok(parent
        .filter(|parent| parent.kind == ChannelType::Category)
        .map(|parent| parent.name))
}
