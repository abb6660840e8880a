//! Civil clock helpers: `HH:MM` parsing, local-time resolution, weekday labels.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

pub fn parse_clock_time(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| anyhow!("invalid clock time '{}' (expected HH:MM or HH:MM:SS)", raw))
}

pub fn format_clock_time(value: NaiveTime) -> String {
    value.format("%H:%M").to_string()
}

pub fn parse_timezone(raw: &str) -> Result<Tz> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|_| anyhow!("invalid timezone '{}'", raw))
}

/// Resolves a civil datetime in `timezone`, preferring the earlier instant on
/// ambiguous (fall-back) times and skipping forward across DST gaps.
pub fn resolve_local(timezone: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    if let Some(resolved) = timezone.from_local_datetime(&naive).earliest() {
        return resolved;
    }
    let shifted = naive + Duration::hours(1);
    timezone
        .from_local_datetime(&shifted)
        .earliest()
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive).with_timezone(&timezone))
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Serde adapter for `NaiveTime` fields written as `HH:MM` in config files.
pub mod serde_clock_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rendered = if value.second() == 0 {
            value.format("%H:%M").to_string()
        } else {
            value.format("%H:%M:%S").to_string()
        };
        serializer.serialize_str(&rendered)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock_time(&raw).map_err(D::Error::custom)
    }
}
