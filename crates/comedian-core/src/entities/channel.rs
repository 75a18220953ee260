//! Channel entity - a Slack channel the bot tracks standups in

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::value_objects::{SubmissionDays, TimeOfDay};

/// Timezone used when a channel has none or an unknown one
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::UTC;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: i64,
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: String,
    /// `None` keeps the channel out of scheduling and reporting
    pub standup_deadline: Option<TimeOfDay>,
    pub submission_days: SubmissionDays,
    /// IANA timezone name, e.g. `Asia/Bishkek`
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl Channel {
    /// Create a channel that is not persisted yet (`id == 0`)
    pub fn new(team_id: String, channel_id: String, channel_name: String, timezone: String) -> Self {
        Self {
            id: 0,
            team_id,
            channel_id,
            channel_name,
            standup_deadline: None,
            submission_days: SubmissionDays::default(),
            timezone,
            created_at: Utc::now(),
        }
    }

    /// Whether the channel takes part in scheduling
    #[inline]
    pub fn is_active(&self) -> bool {
        self.standup_deadline.is_some()
    }

    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(DEFAULT_TIMEZONE)
    }

    /// Today's local date for this channel
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz()).date_naive()
    }

    /// Deadline anchored to a local date
    pub fn deadline_on(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let deadline = self.standup_deadline?;
        deadline.on(date, self.tz()).map(|dt| dt.with_timezone(&Utc))
    }

    /// Start of a local day as a UTC instant
    pub fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        start_of_day(date, self.tz())
    }
}

/// Local midnight in `tz` expressed in UTC
pub fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    use chrono::{LocalResult, TimeZone};

    let naive = date.and_time(chrono::NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // A DST gap at midnight; the offset before the gap is close enough
        LocalResult::None => tz
            .from_utc_datetime(&naive)
            .with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn channel(tz: &str) -> Channel {
        Channel::new(
            "T1".to_string(),
            "C1".to_string(),
            "general".to_string(),
            tz.to_string(),
        )
    }

    #[test]
    fn test_new_channel_is_inactive() {
        let ch = channel("UTC");
        assert!(!ch.is_active());
        assert_eq!(ch.submission_days, SubmissionDays::WORKDAYS);
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        assert_eq!(channel("Mars/Olympus").tz(), DEFAULT_TIMEZONE);
        assert_eq!(channel("Asia/Bishkek").tz(), chrono_tz::Asia::Bishkek);
    }

    #[test]
    fn test_deadline_on_date() {
        let mut ch = channel("Asia/Bishkek");
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(ch.deadline_on(date), None);

        ch.standup_deadline = TimeOfDay::from_hm(10, 30);
        let deadline = ch.deadline_on(date).unwrap();
        assert_eq!(deadline, Utc.with_ymd_and_hms(2024, 3, 4, 4, 30, 0).unwrap());
    }

    #[test]
    fn test_local_date_and_day_start() {
        let ch = channel("Asia/Bishkek");
        // 20:00 UTC is already the next day in UTC+6
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 20, 0, 0).unwrap();
        let date = ch.local_date(now);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(ch.day_start(date).hour(), 18);
    }
}
