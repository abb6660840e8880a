//! Prefix command parsing and platform-neutral command responses.

use afk_channel_match::{ConversationSpace, SpaceKind};
use chrono::{DateTime, Utc};

use crate::auto_responder::AutoResponder;

pub const DEFAULT_COMMAND_PREFIX: &str = "!";
pub const NOTICE_PREVIEW_MARKER: &str = "⬆️ Above is a preview of the automatic notice";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported responder commands.
pub enum ResponderCommand {
    Status,
    Check,
    List,
    Test,
    Clear,
    Add,
    Remove,
    Help,
}

impl ResponderCommand {
    pub const ALL: [ResponderCommand; 8] = [
        Self::Status,
        Self::Check,
        Self::List,
        Self::Test,
        Self::Clear,
        Self::Add,
        Self::Remove,
        Self::Help,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Check => "check",
            Self::List => "list",
            Self::Test => "test",
            Self::Clear => "clear",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Help => "help_bot",
        }
    }

    pub fn requires_admin(self) -> bool {
        matches!(
            self,
            Self::List | Self::Test | Self::Clear | Self::Add | Self::Remove
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Status => "Show the responder status",
            Self::Check => "Check whether this channel is monitored",
            Self::List => "List the monitoring configuration",
            Self::Test => "Preview the automatic notice",
            Self::Clear => "Clear all reply records",
            Self::Add => "Mark this channel as already replied",
            Self::Remove => "Remove this channel's replied mark",
            Self::Help => "Show this help message",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|command| command.name() == name)
    }
}

/// Parses `<prefix><name>`; trailing arguments are ignored. Unknown names are
/// not commands.
pub fn parse_responder_command(text: &str, prefix: &str) -> Option<ResponderCommand> {
    if prefix.is_empty() {
        return None;
    }
    let rest = text.trim_start().strip_prefix(prefix)?;
    let name = rest.split_whitespace().next()?;
    if !rest.starts_with(name) {
        return None;
    }
    ResponderCommand::from_name(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTone {
    Success,
    Warning,
    Danger,
    Info,
}

impl PanelTone {
    pub fn rgb(self) -> u32 {
        match self {
            Self::Success => 0x1F8B4C,
            Self::Warning => 0xE67E22,
            Self::Danger => 0xE74C3C,
            Self::Info => 0x3498DB,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Informational panel rendered by transports (Discord renders an embed).
pub struct CommandPanel {
    pub title: String,
    pub description: Option<String>,
    pub tone: PanelTone,
    pub fields: Vec<PanelField>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl CommandPanel {
    fn new(title: impl Into<String>, tone: PanelTone) -> Self {
        Self {
            title: title.into(),
            description: None,
            tone,
            fields: Vec::new(),
            timestamp: None,
        }
    }

    fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(PanelField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Text(String),
    Panel(CommandPanel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub command: ResponderCommand,
    pub replies: Vec<CommandReply>,
}

#[derive(Debug, Clone, Copy)]
/// Invocation context resolved by the transport. `space` is `None` where the
/// transport has no conversation space (direct messages, voice text).
pub struct CommandContext<'a> {
    pub space: Option<&'a ConversationSpace>,
    pub invoker_is_admin: bool,
    pub now: DateTime<Utc>,
    pub prefix: &'a str,
}

pub fn execute_responder_command(
    responder: &AutoResponder,
    command: ResponderCommand,
    context: &CommandContext<'_>,
) -> CommandResponse {
    if command.requires_admin() && !context.invoker_is_admin {
        return CommandResponse {
            command,
            replies: vec![CommandReply::Text(format!(
                "⛔ `{}{}` requires administrator permission.",
                context.prefix,
                command.name()
            ))],
        };
    }

    let replies = match (command, context.space) {
        (ResponderCommand::Status, _) => vec![CommandReply::Panel(render_status_panel(
            responder,
            context.now,
        ))],
        (ResponderCommand::Check, Some(space)) => {
            vec![CommandReply::Panel(render_check_panel(responder, space))]
        }
        (ResponderCommand::List, _) => vec![CommandReply::Panel(render_list_panel(responder))],
        (ResponderCommand::Test, _) => vec![
            CommandReply::Text(responder.render_notice(context.now)),
            CommandReply::Text(NOTICE_PREVIEW_MARKER.to_string()),
        ],
        (ResponderCommand::Clear, _) => {
            let removed = responder.clear_replied();
            tracing::info!(removed, "reply records cleared");
            vec![CommandReply::Text(format!(
                "✅ Cleared reply records for {removed} channel(s)"
            ))]
        }
        (ResponderCommand::Add, Some(space)) => {
            let text = if responder.mark_replied(space.id) {
                "✅ Marked this channel as replied; no automatic notice will be sent here"
            } else {
                "⚠️ This channel is already marked as replied"
            };
            vec![CommandReply::Text(text.to_string())]
        }
        (ResponderCommand::Remove, Some(space)) => {
            let text = if responder.unmark_replied(space.id) {
                "✅ Removed this channel from the replied list; automatic notices can be sent again"
            } else {
                "⚠️ This channel is not marked as replied"
            };
            vec![CommandReply::Text(text.to_string())]
        }
        (ResponderCommand::Help, _) => {
            vec![CommandReply::Panel(render_help_panel(context.prefix))]
        }
        (ResponderCommand::Check | ResponderCommand::Add | ResponderCommand::Remove, None) => {
            vec![CommandReply::Text(format!(
                "⚠️ `{}{}` only works in a server channel, thread, or forum post.",
                context.prefix,
                command.name()
            ))]
        }
    };
    CommandResponse { command, replies }
}

fn render_status_panel(responder: &AutoResponder, now: DateTime<Utc>) -> CommandPanel {
    let snapshot = responder.snapshot(now);
    let policy = responder.policy();
    let tone = if snapshot.unavailable {
        PanelTone::Warning
    } else {
        PanelTone::Success
    };
    let status = if snapshot.unavailable {
        "😴 Unavailable (automatic notices active)"
    } else {
        "✅ Available (no automatic notices)"
    };

    let mut panel = CommandPanel::new("🤖 Responder Status", tone)
        .field(
            "📅 Current time",
            snapshot
                .local_time
                .format("%Y-%m-%d %H:%M:%S (%A)")
                .to_string(),
        )
        .field(
            "🕐 Availability window",
            format!("{}\n{}", policy.window_summary(), policy.timezone().name()),
        )
        .field("💼 Current status", status);
    panel.timestamp = Some(now);

    let monitor = responder.monitor_config();
    let mut monitoring = Vec::new();
    if !monitor.categories.is_empty() {
        monitoring.push(format!("📁 Categories: {}", monitor.categories.len()));
    }
    if !monitor.channels.is_empty() {
        monitoring.push(format!("💬 Channels: {}", monitor.channels.len()));
    }
    if monitor.monitor_forums {
        monitoring.push("📋 Forums: enabled".to_string());
    }
    if !monitoring.is_empty() {
        panel = panel.field("🔍 Monitoring", monitoring.join("\n"));
    }

    panel = panel.field(
        "📊 Statistics",
        format!("Replied channels: {}", responder.replied_count()),
    );
    if snapshot.unavailable {
        panel = panel.field("⏰ Next availability", snapshot.next_available);
    }
    panel
}

fn render_check_panel(responder: &AutoResponder, space: &ConversationSpace) -> CommandPanel {
    let evaluation = responder.evaluate_space(space);
    let tone = if evaluation.monitored() {
        PanelTone::Success
    } else {
        PanelTone::Danger
    };
    let mut panel = CommandPanel::new("🔍 Channel Check", tone)
        .field("Channel name", space.name.clone())
        .field("Channel type", space.kind_label())
        .field("Channel ID", space.id.to_string());

    if let Some(category) = &space.category {
        panel = panel.field("Category", category.name.clone());
    } else if let Some(parent) = space.parent() {
        let label = if parent.kind == SpaceKind::Forum {
            "Forum"
        } else {
            "Parent channel"
        };
        panel = panel.field(label, parent.name.clone());
    }

    let verdict = if evaluation.monitored() {
        "✅ Monitored"
    } else {
        "❌ Not monitored"
    };
    panel = panel.field(
        "Monitoring",
        format!("{verdict} (`{}`)", evaluation.reason_code()),
    );
    if responder.is_replied(space.id) {
        panel = panel.field(
            "Reply status",
            "⚠️ Already replied here (no further automatic notices)",
        );
    }
    panel
}

fn render_list_panel(responder: &AutoResponder) -> CommandPanel {
    let monitor = responder.monitor_config();
    let mut panel = CommandPanel::new("📋 Monitoring Configuration", PanelTone::Info);
    if !monitor.categories.is_empty() {
        panel = panel.field("📁 Categories", bullet_list(&monitor.categories));
    }
    if !monitor.channels.is_empty() {
        let channels = monitor
            .channels
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        panel = panel.field("💬 Channels", bullet_list(&channels));
    }
    let forum_status = if monitor.monitor_forums {
        "✅ Enabled"
    } else {
        "❌ Disabled"
    };
    panel = panel.field("📋 Forum monitoring", forum_status);
    if !monitor.forums.is_empty() {
        panel = panel.field("📋 Forums", bullet_list(&monitor.forums));
    } else if monitor.monitor_forums {
        panel = panel.field(
            "📋 Forums",
            format!(
                "(none listed: `{}`)",
                responder.matcher().empty_forum_names().as_str()
            ),
        );
    }
    panel
}

fn render_help_panel(prefix: &str) -> CommandPanel {
    let mut panel = CommandPanel::new("🤖 Responder Commands", PanelTone::Info);
    panel.description = Some("Available commands:".to_string());
    for command in ResponderCommand::ALL {
        let name = if command.requires_admin() {
            format!("{prefix}{} (admin)", command.name())
        } else {
            format!("{prefix}{}", command.name())
        };
        panel = panel.field(name, command.description());
    }
    panel
}

fn bullet_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| format!("• {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use afk_channel_match::{ChannelMatcherEntry, ConversationSpace, MonitorConfig, SpaceId};
    use afk_presence::{TimeWindowConfig, TimeWindowPolicy, WorkingHoursConfig};
    use chrono::{DateTime, TimeZone, Utc};

    use super::{
        execute_responder_command, parse_responder_command, CommandContext, CommandReply,
        CommandResponse, ResponderCommand, NOTICE_PREVIEW_MARKER,
    };
    use crate::auto_responder::AutoResponder;
    use crate::notice_template::NoticeTemplate;

    fn responder() -> AutoResponder {
        AutoResponder::new(
            MonitorConfig {
                categories: vec!["Ticket".to_string()],
                channels: vec![
                    ChannelMatcherEntry::Id(SpaceId::new(822_211_672_840_208_395)),
                    ChannelMatcherEntry::Name("general".to_string()),
                ],
                ..MonitorConfig::default()
            },
            TimeWindowPolicy::from_config(
                chrono_tz::Asia::Taipei,
                &TimeWindowConfig::WorkingHours(WorkingHoursConfig::default()),
            ),
            NoticeTemplate::new("status: {status_message}"),
        )
    }

    fn now() -> DateTime<Utc> {
        chrono_tz::Asia::Taipei
            .with_ymd_and_hms(2026, 10, 14, 22, 0, 0)
            .single()
            .expect("local time")
            .with_timezone(&Utc)
    }

    fn run(
        responder: &AutoResponder,
        command: ResponderCommand,
        space: &ConversationSpace,
        admin: bool,
    ) -> CommandResponse {
        execute_responder_command(
            responder,
            command,
            &CommandContext {
                space: Some(space),
                invoker_is_admin: admin,
                now: now(),
                prefix: "!",
            },
        )
    }

    fn only_text(response: &CommandResponse) -> &str {
        match response.replies.as_slice() {
            [CommandReply::Text(text)] => text,
            other => panic!("expected one text reply, got {other:?}"),
        }
    }

    #[test]
    fn unit_parse_command_requires_prefix_and_known_name() {
        assert_eq!(
            parse_responder_command("!status", "!"),
            Some(ResponderCommand::Status)
        );
        assert_eq!(
            parse_responder_command("  !help_bot please", "!"),
            Some(ResponderCommand::Help)
        );
        assert_eq!(parse_responder_command("! status", "!"), None);
        assert_eq!(parse_responder_command("status", "!"), None);
        assert_eq!(parse_responder_command("!statusx", "!"), None);
        assert_eq!(parse_responder_command("!unknown", "!"), None);
        assert_eq!(
            parse_responder_command("afk: clear", "afk: "),
            Some(ResponderCommand::Clear)
        );
        assert_eq!(parse_responder_command("!status", ""), None);
    }

    #[test]
    fn unit_admin_commands_are_denied_for_regular_members() {
        let responder = responder();
        let space = ConversationSpace::plain(1_u64, "general");
        responder.mark_replied(space.id);
        for command in ResponderCommand::ALL {
            let response = run(&responder, command, &space, false);
            if command.requires_admin() {
                assert!(only_text(&response).contains("requires administrator permission"));
            }
        }
        assert_eq!(responder.replied_count(), 1);
    }

    #[test]
    fn functional_add_remove_clear_report_no_ops() {
        let responder = responder();
        let space = ConversationSpace::plain(1_u64, "general");

        let added = run(&responder, ResponderCommand::Add, &space, true);
        assert!(only_text(&added).starts_with("✅ Marked"));
        let again = run(&responder, ResponderCommand::Add, &space, true);
        assert!(only_text(&again).contains("already marked"));

        let removed = run(&responder, ResponderCommand::Remove, &space, true);
        assert!(only_text(&removed).starts_with("✅ Removed"));
        let absent = run(&responder, ResponderCommand::Remove, &space, true);
        assert!(only_text(&absent).contains("not marked"));

        for id in [1_u64, 2, 3] {
            responder.mark_replied(SpaceId::new(id));
        }
        let cleared = run(&responder, ResponderCommand::Clear, &space, true);
        assert_eq!(only_text(&cleared), "✅ Cleared reply records for 3 channel(s)");
        assert_eq!(responder.replied_count(), 0);
    }

    #[test]
    fn functional_check_panel_reports_verdict_parent_and_reply_state() {
        let responder = responder();
        let parent = ConversationSpace::plain(10_u64, "general");
        let thread = ConversationSpace::thread(11_u64, "side", parent);
        responder.mark_replied(thread.id);

        let response = run(&responder, ResponderCommand::Check, &thread, false);
        let [CommandReply::Panel(panel)] = response.replies.as_slice() else {
            panic!("expected a panel");
        };
        assert_eq!(panel.field_value("Channel type"), Some("Thread"));
        assert_eq!(panel.field_value("Parent channel"), Some("general"));
        assert_eq!(
            panel.field_value("Monitoring"),
            Some("✅ Monitored (`allow_channel_name`)")
        );
        assert!(panel.field_value("Reply status").is_some());
    }

    #[test]
    fn functional_status_panel_includes_next_availability_when_away() {
        let responder = responder();
        let space = ConversationSpace::plain(1_u64, "general");
        let response = run(&responder, ResponderCommand::Status, &space, false);
        let [CommandReply::Panel(panel)] = response.replies.as_slice() else {
            panic!("expected a panel");
        };
        assert_eq!(
            panel.field_value("💼 Current status"),
            Some("😴 Unavailable (automatic notices active)")
        );
        assert_eq!(
            panel.field_value("⏰ Next availability"),
            Some("Expected response after **21:00 tomorrow**.")
        );
        assert_eq!(
            panel.field_value("🔍 Monitoring"),
            Some("📁 Categories: 1\n💬 Channels: 2\n📋 Forums: enabled")
        );
        assert_eq!(panel.field_value("📊 Statistics"), Some("Replied channels: 0"));
    }

    #[test]
    fn functional_list_and_test_render_configuration_and_preview() {
        let responder = responder();
        let space = ConversationSpace::plain(1_u64, "general");
        let listed = run(&responder, ResponderCommand::List, &space, true);
        let [CommandReply::Panel(panel)] = listed.replies.as_slice() else {
            panic!("expected a panel");
        };
        assert_eq!(
            panel.field_value("💬 Channels"),
            Some("• 822211672840208395 (id)\n• \"general\" (name contains)")
        );
        assert_eq!(
            panel.field_value("📋 Forums"),
            Some("(none listed: `match_all`)")
        );

        let preview = run(&responder, ResponderCommand::Test, &space, true);
        assert_eq!(
            preview.replies,
            vec![
                CommandReply::Text(
                    "status: It's after my working hours (ends at 08:00)".to_string()
                ),
                CommandReply::Text(NOTICE_PREVIEW_MARKER.to_string()),
            ]
        );
    }

    #[test]
    fn regression_commands_outside_a_space_answer_or_explain() {
        let responder = responder();
        let run_without_space = |command, admin| {
            execute_responder_command(
                &responder,
                command,
                &CommandContext {
                    space: None,
                    invoker_is_admin: admin,
                    now: now(),
                    prefix: "!",
                },
            )
        };

        let help = run_without_space(ResponderCommand::Help, false);
        assert!(matches!(help.replies.as_slice(), [CommandReply::Panel(_)]));
        let status = run_without_space(ResponderCommand::Status, false);
        assert!(matches!(status.replies.as_slice(), [CommandReply::Panel(_)]));

        let check = run_without_space(ResponderCommand::Check, false);
        assert_eq!(
            only_text(&check),
            "⚠️ `!check` only works in a server channel, thread, or forum post."
        );
        let add = run_without_space(ResponderCommand::Add, true);
        assert!(only_text(&add).contains("only works in a server channel"));
        assert_eq!(responder.replied_count(), 0);

        let denied = run_without_space(ResponderCommand::Remove, false);
        assert!(only_text(&denied).contains("requires administrator permission"));
    }

    #[test]
    fn unit_help_panel_lists_every_command_with_prefix() {
        let responder = responder();
        let space = ConversationSpace::plain(1_u64, "general");
        let response = run(&responder, ResponderCommand::Help, &space, false);
        let [CommandReply::Panel(panel)] = response.replies.as_slice() else {
            panic!("expected a panel");
        };
        assert_eq!(panel.fields.len(), ResponderCommand::ALL.len());
        assert!(panel.field_value("!clear (admin)").is_some());
        assert!(panel.field_value("!status").is_some());
    }
}
