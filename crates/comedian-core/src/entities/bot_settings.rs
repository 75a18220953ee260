//! BotSettings entity - per-workspace configuration of a running bot

use chrono::{Duration, Weekday};
use chrono_tz::Tz;

use super::channel::DEFAULT_TIMEZONE;
use crate::value_objects::TimeOfDay;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    pub id: i64,
    pub team_id: String,
    pub team_name: String,
    pub bot_user_id: String,
    pub bot_access_token: String,
    pub language: String,
    /// Seconds between scheduler ticks
    pub notifier_interval: i32,
    /// How many repeat reminders follow a missed deadline
    pub reminder_repeats_max: i32,
    /// Minutes between repeat reminders
    pub reminder_time: i64,
    /// Minutes before the deadline the warning goes out
    pub reminder_offset: i64,
    pub reporting_channel: String,
    pub report_time: TimeOfDay,
    pub individual_reports_on: bool,
    pub timezone: String,
}

impl BotSettings {
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(DEFAULT_TIMEZONE)
    }

    #[inline]
    pub fn reminder_interval(&self) -> Duration {
        Duration::minutes(self.reminder_time)
    }

    #[inline]
    pub fn warning_offset(&self) -> Duration {
        Duration::minutes(self.reminder_offset)
    }

    /// Weekly reports go out together with the Monday daily report
    #[inline]
    pub fn is_weekly_report_day(day: Weekday) -> bool {
        day == Weekday::Mon
    }
}
