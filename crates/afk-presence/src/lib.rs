//! Operator availability windows for the afk responder.
//!
//! Maps wall-clock instants to an availability verdict plus the human-readable
//! status and "next available" strings embedded in automatic notices. Two
//! window variants exist (working hours and nightly sleep window); both are
//! reached through [`TimeWindowPolicy`].

pub mod clock_time;
pub mod sleep_window;
pub mod time_window_config;
pub mod time_window_policy;
pub mod working_hours;

pub use clock_time::{format_clock_time, parse_clock_time, parse_timezone};
pub use sleep_window::SleepWindowPolicy;
pub use time_window_config::*;
pub use time_window_policy::*;
pub use working_hours::WorkingHoursPolicy;
