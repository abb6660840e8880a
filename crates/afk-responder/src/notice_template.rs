//! Automatic notice template and placeholder substitution.

use afk_presence::AvailabilitySnapshot;

pub const PLACEHOLDER_CURRENT_TIME: &str = "{current_time}";
pub const PLACEHOLDER_STATUS_MESSAGE: &str = "{status_message}";
pub const PLACEHOLDER_NEXT_AVAILABLE: &str = "{next_available}";

const PLACEHOLDERS: [&str; 3] = [
    PLACEHOLDER_CURRENT_TIME,
    PLACEHOLDER_STATUS_MESSAGE,
    PLACEHOLDER_NEXT_AVAILABLE,
];

pub const DEFAULT_NOTICE_TEMPLATE: &str = "\
🌙 **I'm currently unavailable**

Hello! Thank you for reaching out.

⏰ **Current time**: {current_time}

**Current status**: {status_message}

I will respond to your inquiry as soon as I'm available. {next_available}

Thank you for your patience! 🙏";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeTemplate {
    raw: String,
}

impl Default for NoticeTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TEMPLATE)
    }
}

impl NoticeTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Substitutes the three placeholders. Any other braces are left as-is.
    pub fn render(&self, current_time: &str, status_message: &str, next_available: &str) -> String {
        self.raw
            .replace(PLACEHOLDER_CURRENT_TIME, current_time)
            .replace(PLACEHOLDER_STATUS_MESSAGE, status_message)
            .replace(PLACEHOLDER_NEXT_AVAILABLE, next_available)
    }

    pub fn render_snapshot(&self, snapshot: &AvailabilitySnapshot) -> String {
        self.render(
            &snapshot.current_time_label(),
            &snapshot.status_message,
            &snapshot.next_available,
        )
    }

    pub fn missing_placeholders(&self) -> Vec<&'static str> {
        PLACEHOLDERS
            .iter()
            .copied()
            .filter(|placeholder| !self.raw.contains(placeholder))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeTemplate, PLACEHOLDER_NEXT_AVAILABLE};

    #[test]
    fn unit_render_substitutes_every_occurrence() {
        let template =
            NoticeTemplate::new("at {current_time}: {status_message}. {next_available} ({current_time})");
        assert_eq!(
            template.render("2026-10-14 22:00", "asleep", "Back at 08:00."),
            "at 2026-10-14 22:00: asleep. Back at 08:00. (2026-10-14 22:00)"
        );
    }

    #[test]
    fn regression_render_keeps_unknown_braces_intact() {
        let template = NoticeTemplate::new("{greeting} <t:1759449600:t> {status_message}");
        assert_eq!(
            template.render("now", "away", "later"),
            "{greeting} <t:1759449600:t> away"
        );
    }

    #[test]
    fn unit_missing_placeholders_reports_absent_fields() {
        assert!(NoticeTemplate::default().missing_placeholders().is_empty());
        let partial = NoticeTemplate::new("{current_time} {status_message}");
        assert_eq!(
            partial.missing_placeholders(),
            vec![PLACEHOLDER_NEXT_AVAILABLE]
        );
    }
}
