use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::conversation_space::SpaceId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// One `channels` entry: a JSON number is an exact id, a JSON string is a
/// case-insensitive name substring.
pub enum ChannelMatcherEntry {
    Id(SpaceId),
    Name(String),
}

impl fmt::Display for ChannelMatcherEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id} (id)"),
            Self::Name(name) => write!(f, "\"{name}\" (name contains)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// What an empty `forums` list means when forum monitoring is enabled.
pub enum EmptyForumNames {
    MatchAll,
    MatchNone,
}

impl EmptyForumNames {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MatchAll => "match_all",
            Self::MatchNone => "match_none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Static monitoring rules loaded once at startup.
pub struct MonitorConfig {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub channels: Vec<ChannelMatcherEntry>,
    #[serde(default = "default_monitor_forums")]
    pub monitor_forums: bool,
    #[serde(default)]
    pub forums: Vec<String>,
    /// Unset means the convention of the active window variant applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_forum_names: Option<EmptyForumNames>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            channels: Vec::new(),
            monitor_forums: default_monitor_forums(),
            forums: Vec::new(),
            empty_forum_names: None,
        }
    }
}

fn default_monitor_forums() -> bool {
    true
}

impl MonitorConfig {
    pub fn channel_ids(&self) -> impl Iterator<Item = SpaceId> + '_ {
        self.channels.iter().filter_map(|entry| match entry {
            ChannelMatcherEntry::Id(id) => Some(*id),
            ChannelMatcherEntry::Name(_) => None,
        })
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.channels.iter().filter_map(|entry| match entry {
            ChannelMatcherEntry::Name(name) => Some(name.as_str()),
            ChannelMatcherEntry::Id(_) => None,
        })
    }

    pub fn has_any_rule(&self) -> bool {
        !self.categories.is_empty() || !self.channels.is_empty() || self.monitor_forums
    }
}

pub fn validate_monitor_config(config: &MonitorConfig) -> Result<()> {
    for (index, category) in config.categories.iter().enumerate() {
        if category.trim().is_empty() {
            bail!("monitor.categories[{index}] must not be empty");
        }
    }
    for (index, entry) in config.channels.iter().enumerate() {
        if let ChannelMatcherEntry::Name(name) = entry {
            if name.trim().is_empty() {
                bail!("monitor.channels[{index}] must not be an empty name");
            }
        }
    }
    for (index, forum) in config.forums.iter().enumerate() {
        if forum.trim().is_empty() {
            bail!("monitor.forums[{index}] must not be empty");
        }
    }
    Ok(())
}

pub fn collect_monitor_warnings(config: &MonitorConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if !config.has_any_rule() {
        warnings.push(
            "monitor has no categories, channels, or forum monitoring: no space will ever be monitored"
                .to_string(),
        );
    }
    if !config.monitor_forums && !config.forums.is_empty() {
        warnings.push(
            "monitor.forums is set but monitor_forums is false: forum names are ignored".to_string(),
        );
    }
    warnings
}
