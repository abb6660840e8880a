use chrono::{DateTime, Duration, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::clock_time::{format_clock_time, resolve_local};
use crate::time_window_config::SleepWindowConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Availability policy for operators who are only away during a nightly block.
pub struct SleepWindowPolicy {
    timezone: Tz,
    block_start: NaiveTime,
    block_end: NaiveTime,
}

impl SleepWindowPolicy {
    pub fn new(timezone: Tz, config: &SleepWindowConfig) -> Self {
        Self {
            timezone,
            block_start: config.block_start,
            block_end: config.block_end,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn block_start(&self) -> NaiveTime {
        self.block_start
    }

    pub fn block_end(&self) -> NaiveTime {
        self.block_end
    }

    pub fn is_unavailable(&self, now: DateTime<Utc>) -> bool {
        let current = now.with_timezone(&self.timezone).time();
        if self.block_start < self.block_end {
            self.block_start <= current && current < self.block_end
        } else {
            current >= self.block_start || current < self.block_end
        }
    }

    pub fn status_message(&self, now: DateTime<Utc>) -> String {
        if self.is_unavailable(now) {
            format!(
                "It's my rest time ({} - {}), I'm probably asleep",
                format_clock_time(self.block_start),
                format_clock_time(self.block_end)
            )
        } else {
            "I'm awake but currently busy with other work".to_string()
        }
    }

    /// Next instant the block ends: today's `block_end`, or tomorrow's if
    /// today's has already passed.
    pub fn next_wake_time(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        let local = now.with_timezone(&self.timezone);
        let today = local.date_naive();
        let anchor = resolve_local(self.timezone, today.and_time(self.block_end));
        if anchor > local {
            anchor
        } else {
            resolve_local(
                self.timezone,
                (today + Duration::days(1)).and_time(self.block_end),
            )
        }
    }

    pub fn next_available_message(&self, now: DateTime<Utc>) -> String {
        if !self.is_unavailable(now) {
            return "I should be available now.".to_string();
        }
        let local = now.with_timezone(&self.timezone);
        let wake = self.next_wake_time(now);
        let day = if wake.date_naive() == local.date_naive() {
            "today"
        } else {
            "tomorrow"
        };
        format!(
            "Expected response after **{} {day}** ({}).",
            wake.format("%H:%M"),
            wake.format("%Y-%m-%d")
        )
    }

    pub fn window_summary(&self) -> String {
        format!(
            "Daily rest {} - {}",
            format_clock_time(self.block_start),
            format_clock_time(self.block_end)
        )
    }
}
