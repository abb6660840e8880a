use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::clock_time::{format_clock_time, weekday_name};
use crate::time_window_config::{WorkingHoursConfig, ALL_WEEKDAYS};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Availability policy for operators with fixed working hours.
pub struct WorkingHoursPolicy {
    timezone: Tz,
    active_days: [bool; 7],
    start: NaiveTime,
    end: NaiveTime,
}

impl WorkingHoursPolicy {
    pub fn new(timezone: Tz, config: &WorkingHoursConfig) -> Self {
        let mut active_days = [false; 7];
        for day in &config.active_weekdays {
            active_days[day.num_days_from_monday() as usize] = true;
        }
        Self {
            timezone,
            active_days,
            start: config.start,
            end: config.end,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn is_active_day(&self, day: Weekday) -> bool {
        self.active_days[day.num_days_from_monday() as usize]
    }

    pub fn active_weekdays(&self) -> Vec<Weekday> {
        ALL_WEEKDAYS
            .iter()
            .copied()
            .filter(|day| self.is_active_day(*day))
            .collect()
    }

    pub fn is_unavailable(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.timezone);
        let current = local.time();
        // Inclusive on both ends, no wrap-around.
        let working =
            self.is_active_day(local.weekday()) && self.start <= current && current <= self.end;
        !working
    }

    pub fn status_message(&self, now: DateTime<Utc>) -> String {
        let local = now.with_timezone(&self.timezone);
        let day = local.weekday();
        if !self.is_active_day(day) {
            return format!("It's {}, which is my day off", weekday_name(day));
        }
        let current = local.time();
        if current < self.start {
            format!(
                "It's before my working hours (starts at {})",
                format_clock_time(self.start)
            )
        } else if current > self.end {
            format!(
                "It's after my working hours (ends at {})",
                format_clock_time(self.end)
            )
        } else {
            "I'm currently working on other tasks or may be working overtime at my day job"
                .to_string()
        }
    }

    pub fn next_available_message(&self, now: DateTime<Utc>) -> String {
        let local = now.with_timezone(&self.timezone);
        let today = local.weekday();
        let start = format_clock_time(self.start);

        if self.is_active_day(today) && local.time() < self.start {
            return format!("Expected response after **{start} today**.");
        }

        let days_ahead = (1..=7_u32).find(|offset| {
            let candidate = (today.num_days_from_monday() + offset) % 7;
            self.active_days[candidate as usize]
        });
        match days_ahead {
            Some(1) => format!("Expected response after **{start} tomorrow**."),
            Some(offset) => {
                let next_day = ALL_WEEKDAYS[((today.num_days_from_monday() + offset) % 7) as usize];
                format!(
                    "Expected response after **{start} on {}**.",
                    weekday_name(next_day)
                )
            }
            None => "No working days are configured, so I can't say when I'll be back.".to_string(),
        }
    }

    pub fn window_summary(&self) -> String {
        let days = self
            .active_weekdays()
            .into_iter()
            .map(weekday_name)
            .collect::<Vec<_>>();
        let days = if days.len() == 7 {
            "Every day".to_string()
        } else if days.is_empty() {
            "No working days".to_string()
        } else {
            days.join(", ")
        };
        format!(
            "{days}\n{} - {}",
            format_clock_time(self.start),
            format_clock_time(self.end)
        )
    }
}
