//! Per-message decision procedure for automatic unavailability notices.

use std::sync::{Mutex, MutexGuard, PoisonError};

use afk_channel_match::{
    ChannelMatcher, ConversationSpace, EmptyForumNames, MonitorConfig, MonitorEvaluation,
    MonitorReason, SpaceId,
};
use afk_presence::{AvailabilitySnapshot, TimeWindowKind, TimeWindowPolicy};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::notice_template::NoticeTemplate;
use crate::reply_ledger::ReplyLedger;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates notice delivery failures reported by a transport.
pub enum SendError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("send failed: {0}")]
    Transient(String),
}

#[async_trait]
/// Trait contract for delivering a rendered notice into a conversation space.
pub trait NoticeSender: Send + Sync {
    async fn send_notice(&self, space: &ConversationSpace, content: &str) -> Result<(), SendError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One inbound message event, reduced to what the decision needs.
pub struct InboundMessage {
    pub space: ConversationSpace,
    pub author_name: String,
    pub author_is_bot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of handling one inbound message.
pub enum ResponderDecision {
    IgnoredBotAuthor,
    NotMonitored { reason: MonitorReason },
    AlreadyReplied,
    OperatorAvailable,
    Sent,
    PermissionDenied,
    SendFailed,
}

impl ResponderDecision {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::IgnoredBotAuthor => "skip_bot_author",
            Self::NotMonitored { .. } => "skip_not_monitored",
            Self::AlreadyReplied => "skip_already_replied",
            Self::OperatorAvailable => "skip_operator_available",
            Self::Sent => "sent_notice",
            Self::PermissionDenied => "deny_send_permission",
            Self::SendFailed => "error_send_failed",
        }
    }

    pub fn sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Convention for an empty forum-name list under each window variant.
pub fn default_empty_forum_names(kind: TimeWindowKind) -> EmptyForumNames {
    match kind {
        TimeWindowKind::WorkingHours => EmptyForumNames::MatchAll,
        TimeWindowKind::SleepWindow => EmptyForumNames::MatchNone,
    }
}

/// Owns the monitoring rules, the availability policy, the notice template,
/// and the reply ledger for one process.
pub struct AutoResponder {
    monitor: MonitorConfig,
    matcher: ChannelMatcher,
    policy: TimeWindowPolicy,
    template: NoticeTemplate,
    ledger: Mutex<ReplyLedger>,
}

impl AutoResponder {
    pub fn new(monitor: MonitorConfig, policy: TimeWindowPolicy, template: NoticeTemplate) -> Self {
        let matcher = ChannelMatcher::new(&monitor, default_empty_forum_names(policy.kind()));
        Self {
            monitor,
            matcher,
            policy,
            template,
            ledger: Mutex::new(ReplyLedger::new()),
        }
    }

    pub fn monitor_config(&self) -> &MonitorConfig {
        &self.monitor
    }

    pub fn matcher(&self) -> &ChannelMatcher {
        &self.matcher
    }

    pub fn policy(&self) -> &TimeWindowPolicy {
        &self.policy
    }

    pub fn template(&self) -> &NoticeTemplate {
        &self.template
    }

    pub fn evaluate_space(&self, space: &ConversationSpace) -> MonitorEvaluation {
        self.matcher.evaluate(space)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> AvailabilitySnapshot {
        self.policy.snapshot(now)
    }

    pub fn render_notice(&self, now: DateTime<Utc>) -> String {
        self.template.render_snapshot(&self.policy.snapshot(now))
    }

    pub fn is_replied(&self, id: SpaceId) -> bool {
        self.ledger().contains(id)
    }

    pub fn replied_count(&self) -> usize {
        self.ledger().len()
    }

    /// Administrative mark. Returns `false` when the space was already marked.
    pub fn mark_replied(&self, id: SpaceId) -> bool {
        self.ledger().insert(id)
    }

    /// Administrative unmark. Returns `false` when the space was not marked.
    pub fn unmark_replied(&self, id: SpaceId) -> bool {
        self.ledger().remove(id)
    }

    pub fn clear_replied(&self) -> usize {
        self.ledger().clear()
    }

    fn ledger(&self) -> MutexGuard<'_, ReplyLedger> {
        // A poisoned lock still guards a consistent set.
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn handle_message(
        &self,
        message: &InboundMessage,
        now: DateTime<Utc>,
        sender: &dyn NoticeSender,
    ) -> ResponderDecision {
        let space = &message.space;
        if message.author_is_bot {
            return ResponderDecision::IgnoredBotAuthor;
        }

        let evaluation = self.matcher.evaluate(space);
        if !evaluation.monitored() {
            tracing::debug!(
                space_id = %space.id,
                space_name = %space.name,
                space_kind = space.kind.as_str(),
                reason_code = evaluation.reason_code(),
                "space not monitored"
            );
            return ResponderDecision::NotMonitored {
                reason: evaluation.reason,
            };
        }

        if self.is_replied(space.id) {
            return ResponderDecision::AlreadyReplied;
        }

        if !self.policy.is_unavailable(now) {
            tracing::info!(
                space_id = %space.id,
                space_name = %space.name,
                "operator available, no automatic notice"
            );
            return ResponderDecision::OperatorAvailable;
        }

        // Reserve before the send suspends so overlapping messages in the same
        // space cannot both pass the ledger check.
        let Some(reservation) = self.ledger().reserve(space.id) else {
            return ResponderDecision::AlreadyReplied;
        };

        let notice = self.render_notice(now);
        match sender.send_notice(space, &notice).await {
            Ok(()) => {
                self.ledger().settle(reservation);
                tracing::info!(
                    space_id = %space.id,
                    space_name = %space.name,
                    space_kind = space.kind_label(),
                    category = space.category.as_ref().map(|category| category.name.as_str()),
                    author = %message.author_name,
                    reason_code = evaluation.reason_code(),
                    "automatic notice sent"
                );
                ResponderDecision::Sent
            }
            Err(error) => {
                // An administrative change during the send takes precedence.
                let released = self.ledger().release(reservation);
                let decision = match error {
                    SendError::PermissionDenied(_) => ResponderDecision::PermissionDenied,
                    SendError::Transient(_) => ResponderDecision::SendFailed,
                };
                tracing::warn!(
                    space_id = %space.id,
                    space_name = %space.name,
                    reason_code = decision.reason_code(),
                    released,
                    error = %error,
                    "automatic notice not delivered"
                );
                decision
            }
        }
    }
}
