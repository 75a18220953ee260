//! NotificationThread entity - persisted reminder cycle for a channel
//!
//! One row exists while a channel is being reminded about a missed
//! deadline. It carries the time of the next repeat and how many repeats
//! have gone out, so a restarted scheduler does not send duplicates.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationThread {
    pub id: i64,
    pub channel_id: String,
    /// Non-reporters at the last send
    pub user_ids: Vec<String>,
    /// When the next repeat is due
    pub notification_time: DateTime<Utc>,
    pub reminder_counter: i32,
}

impl NotificationThread {
    pub fn new(channel_id: String, user_ids: Vec<String>, notification_time: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            channel_id,
            user_ids,
            notification_time,
            reminder_counter: 0,
        }
    }

    /// Deadline that started this cycle.
    ///
    /// Every send moves `notification_time` one interval forward, starting
    /// one interval after the deadline.
    pub fn deadline(&self, interval: Duration) -> DateTime<Utc> {
        self.notification_time - interval * (self.reminder_counter + 1)
    }

    /// Local date of the deadline this thread belongs to
    pub fn cycle_date(&self, tz: Tz, interval: Duration) -> NaiveDate {
        self.deadline(interval).with_timezone(&tz).date_naive()
    }

    #[inline]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.notification_time
    }

    #[inline]
    pub fn is_exhausted(&self, repeats_max: i32) -> bool {
        self.reminder_counter >= repeats_max
    }

    /// Record a repeat reminder
    pub fn advance(&mut self, interval: Duration, user_ids: Vec<String>) {
        self.reminder_counter += 1;
        self.notification_time += interval;
        self.user_ids = user_ids;
    }

    pub fn joined_user_ids(&self) -> String {
        self.user_ids.join(",")
    }

    pub fn split_user_ids(joined: &str) -> Vec<String> {
        joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_advance() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 10, 45, 0).unwrap();
        let mut thread = NotificationThread::new("C1".to_string(), vec!["U1".to_string()], at);
        assert!(!thread.is_due(at - Duration::minutes(1)));
        assert!(thread.is_due(at));

        thread.advance(Duration::minutes(15), vec![]);
        assert_eq!(thread.reminder_counter, 1);
        assert_eq!(thread.notification_time, at + Duration::minutes(15));
        assert!(thread.is_exhausted(1));
        assert!(!thread.is_exhausted(2));
    }

    #[test]
    fn test_cycle_date_is_the_deadline_day() {
        let deadline = Utc.with_ymd_and_hms(2024, 3, 5, 23, 50, 0).unwrap();
        let interval = Duration::minutes(15);
        let mut thread =
            NotificationThread::new("C1".to_string(), vec!["U1".to_string()], deadline + interval);
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        // first repeat is due after midnight but still belongs to Tuesday
        assert_eq!(thread.deadline(interval), deadline);
        assert_eq!(thread.cycle_date(Tz::UTC, interval), tuesday);

        thread.advance(interval, vec![]);
        assert_eq!(thread.deadline(interval), deadline);
        assert_eq!(thread.cycle_date(Tz::UTC, interval), tuesday);
        assert_eq!(
            thread.cycle_date(chrono_tz::Asia::Tokyo, interval),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
        );
    }

    #[test]
    fn test_user_id_storage_format() {
        let ids = vec!["U1".to_string(), "U2".to_string()];
        let thread = NotificationThread::new("C1".to_string(), ids.clone(), Utc::now());
        assert_eq!(thread.joined_user_ids(), "U1,U2");
        assert_eq!(NotificationThread::split_user_ids("U1, U2,"), ids);
        assert!(NotificationThread::split_user_ids("").is_empty());
    }
}
