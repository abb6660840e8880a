use std::sync::Arc;

use afk_channel_match::ConversationSpace;
use afk_responder::{NoticeSender, SendError};
use async_trait::async_trait;
use serenity::http::{Http, HttpError};
use serenity::model::id::ChannelId;
use serenity::model::ModelError;

use super::discord_render_helpers::truncate_for_discord;

const HTTP_STATUS_FORBIDDEN: u16 = 403;
const DISCORD_CODE_MISSING_ACCESS: isize = 50001;
const DISCORD_CODE_MISSING_PERMISSIONS: isize = 50013;

/// Delivers automatic notices through the Discord REST API.
pub(super) struct DiscordNoticeSender {
    http: Arc<Http>,
}

impl DiscordNoticeSender {
    pub(super) fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl NoticeSender for DiscordNoticeSender {
    async fn send_notice(&self, space: &ConversationSpace, content: &str) -> Result<(), SendError> {
        ChannelId::new(space.id.get())
            .say(self.http.as_ref(), truncate_for_discord(content))
            .await
            .map(|_| ())
            .map_err(|error| classify_send_error(&error))
    }
}

pub(super) fn classify_send_error(error: &serenity::Error) -> SendError {
    match error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            classify_discord_failure(
                response.status_code.as_u16(),
                response.error.code,
                &response.error.message,
            )
        }
        serenity::Error::Model(ModelError::InvalidPermissions { .. }) => {
            SendError::PermissionDenied(error.to_string())
        }
        other => SendError::Transient(other.to_string()),
    }
}

pub(super) fn classify_discord_failure(status: u16, code: isize, message: &str) -> SendError {
    let detail = format!("status={status} code={code} message={message}");
    if status == HTTP_STATUS_FORBIDDEN
        || code == DISCORD_CODE_MISSING_ACCESS
        || code == DISCORD_CODE_MISSING_PERMISSIONS
    {
        SendError::PermissionDenied(detail)
    } else {
        SendError::Transient(detail)
    }
}
