use std::collections::HashSet;

use crate::conversation_space::{ConversationSpace, SpaceId, SpaceKind};
use crate::monitor_config::{EmptyForumNames, MonitorConfig};

/// Upper bound on spaces visited for one decision. Real chains are at most
/// thread -> channel.
pub const MAX_SPACE_EVALUATIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates the rule that produced a monitoring verdict.
pub enum MonitorReason {
    ForumAny,
    ForumNameMatch,
    ForumNameMismatch,
    ForumMonitoringDisabled,
    ChannelId,
    ChannelName,
    CategoryName,
    ThreadWithoutParent,
    NoRuleMatched,
    ParentDepthExceeded,
}

impl MonitorReason {
    pub fn reason_code(self) -> &'static str {
        match self {
            Self::ForumAny => "allow_forum_any",
            Self::ForumNameMatch => "allow_forum_name_match",
            Self::ForumNameMismatch => "deny_forum_name_mismatch",
            Self::ForumMonitoringDisabled => "deny_forum_monitoring_disabled",
            Self::ChannelId => "allow_channel_id",
            Self::ChannelName => "allow_channel_name",
            Self::CategoryName => "allow_category_name",
            Self::ThreadWithoutParent => "deny_thread_without_parent",
            Self::NoRuleMatched => "deny_no_rule_matched",
            Self::ParentDepthExceeded => "deny_parent_depth_exceeded",
        }
    }

    pub fn is_monitored(self) -> bool {
        matches!(
            self,
            Self::ForumAny
                | Self::ForumNameMatch
                | Self::ChannelId
                | Self::ChannelName
                | Self::CategoryName
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorEvaluation {
    pub reason: MonitorReason,
    /// Spaces visited, the evaluated space included.
    pub evaluations: usize,
}

impl MonitorEvaluation {
    pub fn monitored(&self) -> bool {
        self.reason.is_monitored()
    }

    pub fn reason_code(&self) -> &'static str {
        self.reason.reason_code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Monitoring rules with keywords pre-folded for case-insensitive matching.
pub struct ChannelMatcher {
    category_keywords: Vec<String>,
    channel_ids: HashSet<SpaceId>,
    channel_keywords: Vec<String>,
    monitor_forums: bool,
    forum_keywords: Vec<String>,
    empty_forum_names: EmptyForumNames,
}

impl ChannelMatcher {
    /// `default_empty_forum_names` applies when the config leaves the
    /// convention unset.
    pub fn new(config: &MonitorConfig, default_empty_forum_names: EmptyForumNames) -> Self {
        Self {
            category_keywords: fold_keywords(config.categories.iter().map(String::as_str)),
            channel_ids: config.channel_ids().collect(),
            channel_keywords: fold_keywords(config.channel_names()),
            monitor_forums: config.monitor_forums,
            forum_keywords: fold_keywords(config.forums.iter().map(String::as_str)),
            empty_forum_names: config
                .empty_forum_names
                .unwrap_or(default_empty_forum_names),
        }
    }

    pub fn empty_forum_names(&self) -> EmptyForumNames {
        self.empty_forum_names
    }

    pub fn is_monitored(&self, space: &ConversationSpace) -> bool {
        self.evaluate(space).monitored()
    }

    pub fn evaluate(&self, space: &ConversationSpace) -> MonitorEvaluation {
        self.evaluate_at(space, 1)
    }

    fn evaluate_at(&self, space: &ConversationSpace, evaluations: usize) -> MonitorEvaluation {
        if evaluations > MAX_SPACE_EVALUATIONS {
            return MonitorEvaluation {
                reason: MonitorReason::ParentDepthExceeded,
                evaluations: evaluations - 1,
            };
        }
        let reason = match space.kind {
            SpaceKind::Forum => self.forum_reason(&space.name),
            SpaceKind::Thread => match space.parent() {
                // Forum threads are judged by the forum's name, never their own.
                Some(parent) if parent.kind == SpaceKind::Forum => self.forum_reason(&parent.name),
                Some(parent) => return self.evaluate_at(parent, evaluations + 1),
                None => MonitorReason::ThreadWithoutParent,
            },
            SpaceKind::Plain => self.plain_reason(space),
        };
        MonitorEvaluation {
            reason,
            evaluations,
        }
    }

    fn forum_reason(&self, forum_name: &str) -> MonitorReason {
        if !self.monitor_forums {
            return MonitorReason::ForumMonitoringDisabled;
        }
        if self.forum_keywords.is_empty() {
            return match self.empty_forum_names {
                EmptyForumNames::MatchAll => MonitorReason::ForumAny,
                EmptyForumNames::MatchNone => MonitorReason::ForumNameMismatch,
            };
        }
        if contains_any(forum_name, &self.forum_keywords) {
            MonitorReason::ForumNameMatch
        } else {
            MonitorReason::ForumNameMismatch
        }
    }

    fn plain_reason(&self, space: &ConversationSpace) -> MonitorReason {
        if self.channel_ids.contains(&space.id) {
            return MonitorReason::ChannelId;
        }
        if contains_any(&space.name, &self.channel_keywords) {
            return MonitorReason::ChannelName;
        }
        if let Some(category) = &space.category {
            if contains_any(&category.name, &self.category_keywords) {
                return MonitorReason::CategoryName;
            }
        }
        MonitorReason::NoRuleMatched
    }
}

fn fold_keywords<'a>(keywords: impl Iterator<Item = &'a str>) -> Vec<String> {
    keywords.map(str::to_lowercase).collect()
}

fn contains_any(haystack: &str, folded_keywords: &[String]) -> bool {
    if folded_keywords.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();
    folded_keywords
        .iter()
        .any(|keyword| haystack.contains(keyword.as_str()))
}
