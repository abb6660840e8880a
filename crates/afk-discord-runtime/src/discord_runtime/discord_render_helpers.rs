//! Discord message and embed rendering for command responses.

use afk_responder::CommandPanel;
use serenity::builder::CreateEmbed;
use serenity::model::{Colour, Timestamp};

pub(super) const DISCORD_MESSAGE_MAX_CHARS: usize = 2000;
pub(super) const DISCORD_EMBED_FIELD_MAX_CHARS: usize = 1024;
pub(super) const DISCORD_EMBED_TITLE_MAX_CHARS: usize = 256;

/// Truncates to `max_chars` characters, marking the cut with an ellipsis.
pub(super) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}

pub(super) fn truncate_for_discord(text: &str) -> String {
    truncate_chars(text, DISCORD_MESSAGE_MAX_CHARS)
}

pub(super) fn render_panel_embed(panel: &CommandPanel) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(truncate_chars(&panel.title, DISCORD_EMBED_TITLE_MAX_CHARS))
        .colour(Colour::new(panel.tone.rgb()));
    if let Some(description) = &panel.description {
        embed = embed.description(description.as_str());
    }
    for field in &panel.fields {
        let value = if field.value.trim().is_empty() {
            "-".to_string()
        } else {
            truncate_chars(&field.value, DISCORD_EMBED_FIELD_MAX_CHARS)
        };
        embed = embed.field(
            truncate_chars(&field.name, DISCORD_EMBED_TITLE_MAX_CHARS),
            value,
            false,
        );
    }
    if let Some(timestamp) = panel
        .timestamp
        .and_then(|timestamp| Timestamp::from_unix_timestamp(timestamp.timestamp()).ok())
    {
        embed = embed.timestamp(timestamp);
    }
    embed
}
