use std::path::Path;

use afk_channel_match::{collect_monitor_warnings, validate_monitor_config, MonitorConfig};
use afk_presence::{
    collect_time_window_warnings, parse_timezone, TimeWindowConfig, TimeWindowPolicy,
};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auto_responder::AutoResponder;
use crate::notice_template::{NoticeTemplate, DEFAULT_NOTICE_TEMPLATE};

pub const RESPONDER_CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_TIMEZONE: &str = "Asia/Taipei";

fn responder_config_schema_version() -> u32 {
    RESPONDER_CONFIG_SCHEMA_VERSION
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_template() -> String {
    DEFAULT_NOTICE_TEMPLATE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// On-disk responder configuration.
pub struct ResponderConfigFile {
    #[serde(default = "responder_config_schema_version")]
    pub schema_version: u32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub window: TimeWindowConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default = "default_template")]
    pub template: String,
}

impl Default for ResponderConfigFile {
    fn default() -> Self {
        Self {
            schema_version: RESPONDER_CONFIG_SCHEMA_VERSION,
            timezone: default_timezone(),
            window: TimeWindowConfig::default(),
            monitor: MonitorConfig::default(),
            template: default_template(),
        }
    }
}

/// Loads the config file; a missing file yields the built-in defaults.
pub fn load_responder_config(path: &Path) -> Result<ResponderConfigFile> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "responder config not found, using defaults");
        return Ok(ResponderConfigFile::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read responder config {}", path.display()))?;
    let parsed = parse_responder_config(&raw)
        .with_context(|| format!("invalid responder config {}", path.display()))?;
    Ok(parsed)
}

pub fn parse_responder_config(raw: &str) -> Result<ResponderConfigFile> {
    let parsed = serde_json::from_str::<ResponderConfigFile>(raw)
        .context("failed to parse responder config json")?;
    validate_responder_config(&parsed)?;
    Ok(parsed)
}

pub fn validate_responder_config(config: &ResponderConfigFile) -> Result<()> {
    if config.schema_version != RESPONDER_CONFIG_SCHEMA_VERSION {
        bail!(
            "unsupported responder schema_version {} (expected {})",
            config.schema_version,
            RESPONDER_CONFIG_SCHEMA_VERSION
        );
    }
    parse_timezone(&config.timezone)?;
    validate_monitor_config(&config.monitor)?;
    if config.template.trim().is_empty() {
        bail!("template must not be empty");
    }
    Ok(())
}

/// Non-fatal observations: logged at startup and printed by config checks.
pub fn collect_responder_config_warnings(config: &ResponderConfigFile) -> Vec<String> {
    let mut warnings = collect_time_window_warnings(&config.window);
    warnings.extend(collect_monitor_warnings(&config.monitor));
    let missing = NoticeTemplate::new(config.template.as_str()).missing_placeholders();
    if !missing.is_empty() {
        warnings.push(format!(
            "template is missing placeholder(s): {}",
            missing.join(", ")
        ));
    }
    warnings
}

pub fn build_auto_responder(config: &ResponderConfigFile) -> Result<AutoResponder> {
    validate_responder_config(config)?;
    let timezone = parse_timezone(&config.timezone)?;
    let policy = TimeWindowPolicy::from_config(timezone, &config.window);
    Ok(AutoResponder::new(
        config.monitor.clone(),
        policy,
        NoticeTemplate::new(config.template.as_str()),
    ))
}

/// Multi-line human summary of the active configuration.
pub fn render_responder_summary(responder: &AutoResponder, now: DateTime<Utc>) -> String {
    let policy = responder.policy();
    let snapshot = responder.snapshot(now);
    let monitor = responder.monitor_config();
    let availability = if snapshot.unavailable {
        "unavailable"
    } else {
        "available"
    };
    let mut lines = vec![
        format!("timezone: {}", policy.timezone().name()),
        format!("window: {}", policy.kind().as_str()),
        format!(
            "window_summary: {}",
            policy.window_summary().replace('\n', " ")
        ),
        format!(
            "current_time: {}",
            snapshot.local_time.format("%Y-%m-%d %H:%M:%S")
        ),
        format!("availability: {availability}"),
        format!("monitor.categories: {}", monitor.categories.len()),
        format!("monitor.channels: {}", monitor.channels.len()),
        format!("monitor.monitor_forums: {}", monitor.monitor_forums),
        format!("monitor.forums: {}", monitor.forums.len()),
        format!(
            "monitor.empty_forum_names: {}",
            responder.matcher().empty_forum_names().as_str()
        ),
    ];
    if snapshot.unavailable {
        lines.push(format!("next_available: {}", snapshot.next_available));
    }
    lines.join("\n")
}
