use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock_time::{format_clock_time, serde_clock_time};

pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Enumerates supported availability window variants.
pub enum TimeWindowConfig {
    WorkingHours(WorkingHoursConfig),
    SleepWindow(SleepWindowConfig),
}

impl Default for TimeWindowConfig {
    fn default() -> Self {
        Self::WorkingHours(WorkingHoursConfig::default())
    }
}

impl TimeWindowConfig {
    pub fn kind(&self) -> TimeWindowKind {
        match self {
            Self::WorkingHours(_) => TimeWindowKind::WorkingHours,
            Self::SleepWindow(_) => TimeWindowKind::SleepWindow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindowKind {
    WorkingHours,
    SleepWindow,
}

impl TimeWindowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WorkingHours => "working_hours",
            Self::SleepWindow => "sleep_window",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Operator is reachable on `active_weekdays` between `start` and `end`.
///
/// The comparison never wraps past midnight: a `start` later than `end`
/// describes a window that never opens.
pub struct WorkingHoursConfig {
    #[serde(default = "default_active_weekdays")]
    pub active_weekdays: Vec<Weekday>,
    #[serde(with = "serde_clock_time")]
    pub start: NaiveTime,
    #[serde(with = "serde_clock_time")]
    pub end: NaiveTime,
}

impl Default for WorkingHoursConfig {
    fn default() -> Self {
        Self {
            active_weekdays: default_active_weekdays(),
            start: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

fn default_active_weekdays() -> Vec<Weekday> {
    ALL_WEEKDAYS.to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Operator is unreachable from `block_start` until `block_end`, wrapping past
/// midnight when `block_start >= block_end`.
pub struct SleepWindowConfig {
    #[serde(with = "serde_clock_time")]
    pub block_start: NaiveTime,
    #[serde(with = "serde_clock_time")]
    pub block_end: NaiveTime,
}

impl Default for SleepWindowConfig {
    fn default() -> Self {
        Self {
            block_start: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN),
            block_end: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Returns non-fatal observations about a window that is valid but likely
/// not what the operator meant.
pub fn collect_time_window_warnings(config: &TimeWindowConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    match config {
        TimeWindowConfig::WorkingHours(working) => {
            if working.active_weekdays.is_empty() {
                warnings.push(
                    "working_hours.active_weekdays is empty: the operator is always unavailable"
                        .to_string(),
                );
            }
            if working.start > working.end {
                warnings.push(format!(
                    "working_hours.start {} is later than end {}: the window does not wrap past midnight and never opens",
                    format_clock_time(working.start),
                    format_clock_time(working.end)
                ));
            }
        }
        TimeWindowConfig::SleepWindow(sleep) => {
            if sleep.block_start == sleep.block_end {
                warnings.push(format!(
                    "sleep_window.block_start equals block_end ({}): the operator is always unavailable",
                    format_clock_time(sleep.block_start)
                ));
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Weekday};

    use super::{
        collect_time_window_warnings, SleepWindowConfig, TimeWindowConfig, TimeWindowKind,
        WorkingHoursConfig,
    };

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
    }

    #[test]
    fn unit_working_hours_config_parses_tagged_json_with_default_weekdays() {
        let parsed: TimeWindowConfig =
            serde_json::from_str(r#"{"type":"working_hours","start":"09:00","end":"17:30"}"#)
                .expect("parse working hours");
        let TimeWindowConfig::WorkingHours(working) = parsed else {
            panic!("expected working hours variant");
        };
        assert_eq!(working.active_weekdays.len(), 7);
        assert_eq!(working.start, hm(9, 0));
        assert_eq!(working.end, hm(17, 30));
    }

    #[test]
    fn unit_sleep_window_config_parses_and_reports_kind() {
        let parsed: TimeWindowConfig = serde_json::from_str(
            r#"{"type":"sleep_window","block_start":"23:15","block_end":"07:45"}"#,
        )
        .expect("parse sleep window");
        assert_eq!(parsed.kind(), TimeWindowKind::SleepWindow);
        assert_eq!(parsed.kind().as_str(), "sleep_window");
        assert_eq!(
            parsed,
            TimeWindowConfig::SleepWindow(SleepWindowConfig {
                block_start: hm(23, 15),
                block_end: hm(7, 45),
            })
        );
    }

    #[test]
    fn regression_working_hours_config_rejects_malformed_time() {
        let error = serde_json::from_str::<TimeWindowConfig>(
            r#"{"type":"working_hours","start":"9am","end":"17:00"}"#,
        )
        .expect_err("malformed start");
        assert!(error.to_string().contains("invalid clock time '9am'"));
    }

    #[test]
    fn functional_warnings_flag_degenerate_windows() {
        let inverted = TimeWindowConfig::WorkingHours(WorkingHoursConfig::default());
        let warnings = collect_time_window_warnings(&inverted);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("never opens"));

        let no_days = TimeWindowConfig::WorkingHours(WorkingHoursConfig {
            active_weekdays: Vec::new(),
            start: hm(9, 0),
            end: hm(17, 0),
        });
        assert!(collect_time_window_warnings(&no_days)[0].contains("active_weekdays is empty"));

        let zero_length = TimeWindowConfig::SleepWindow(SleepWindowConfig {
            block_start: hm(22, 0),
            block_end: hm(22, 0),
        });
        assert_eq!(collect_time_window_warnings(&zero_length).len(), 1);

        let healthy = TimeWindowConfig::WorkingHours(WorkingHoursConfig {
            active_weekdays: vec![Weekday::Tue, Weekday::Wed],
            start: hm(9, 0),
            end: hm(17, 0),
        });
        assert!(collect_time_window_warnings(&healthy).is_empty());
    }
}
