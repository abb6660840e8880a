use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::sleep_window::SleepWindowPolicy;
use crate::time_window_config::{TimeWindowConfig, TimeWindowKind};
use crate::working_hours::WorkingHoursPolicy;

pub const NOTICE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
/// The configured availability window, selected once at startup.
pub enum TimeWindowPolicy {
    WorkingHours(WorkingHoursPolicy),
    SleepWindow(SleepWindowPolicy),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything a notice or status panel needs about one instant.
pub struct AvailabilitySnapshot {
    pub local_time: DateTime<Tz>,
    pub unavailable: bool,
    pub status_message: String,
    pub next_available: String,
}

impl AvailabilitySnapshot {
    pub fn current_time_label(&self) -> String {
        self.local_time.format(NOTICE_TIME_FORMAT).to_string()
    }
}

impl TimeWindowPolicy {
    pub fn from_config(timezone: Tz, config: &TimeWindowConfig) -> Self {
        match config {
            TimeWindowConfig::WorkingHours(working) => {
                Self::WorkingHours(WorkingHoursPolicy::new(timezone, working))
            }
            TimeWindowConfig::SleepWindow(sleep) => {
                Self::SleepWindow(SleepWindowPolicy::new(timezone, sleep))
            }
        }
    }

    pub fn kind(&self) -> TimeWindowKind {
        match self {
            Self::WorkingHours(_) => TimeWindowKind::WorkingHours,
            Self::SleepWindow(_) => TimeWindowKind::SleepWindow,
        }
    }

    pub fn timezone(&self) -> Tz {
        match self {
            Self::WorkingHours(policy) => policy.timezone(),
            Self::SleepWindow(policy) => policy.timezone(),
        }
    }

    pub fn local_time(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.timezone())
    }

    pub fn is_unavailable(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::WorkingHours(policy) => policy.is_unavailable(now),
            Self::SleepWindow(policy) => policy.is_unavailable(now),
        }
    }

    pub fn status_message(&self, now: DateTime<Utc>) -> String {
        match self {
            Self::WorkingHours(policy) => policy.status_message(now),
            Self::SleepWindow(policy) => policy.status_message(now),
        }
    }

    pub fn next_available_message(&self, now: DateTime<Utc>) -> String {
        match self {
            Self::WorkingHours(policy) => policy.next_available_message(now),
            Self::SleepWindow(policy) => policy.next_available_message(now),
        }
    }

    pub fn window_summary(&self) -> String {
        match self {
            Self::WorkingHours(policy) => policy.window_summary(),
            Self::SleepWindow(policy) => policy.window_summary(),
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> AvailabilitySnapshot {
        AvailabilitySnapshot {
            local_time: self.local_time(now),
            unavailable: self.is_unavailable(now),
            status_message: self.status_message(now),
            next_available: self.next_available_message(now),
        }
    }
}
