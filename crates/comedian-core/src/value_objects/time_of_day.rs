//! Time of day used for channel deadlines and personal timetables
//!
//! Stored as seconds since local midnight. Zero is reserved in storage for
//! "not set", so midnight itself cannot be used as a deadline.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay(u32);

/// Why a time string was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("empty time")]
    Empty,
    #[error("malformed time: {0}")]
    Malformed(String),
    #[error("time out of range: {0}")]
    OutOfRange(String),
    #[error("midnight cannot be used")]
    Midnight,
}

impl TimeOfDay {
    pub const NINE_AM: Self = Self(9 * 3600);

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 3600 + minute * 60))
    }

    /// Build from a stored value; zero and out-of-range values mean "unset"
    pub fn from_seconds(seconds: i64) -> Option<Self> {
        if seconds <= 0 || seconds >= i64::from(SECONDS_PER_DAY) {
            return None;
        }
        Some(Self(seconds as u32))
    }

    #[inline]
    pub fn seconds(self) -> i64 {
        i64::from(self.0)
    }

    #[inline]
    pub fn hour(self) -> u32 {
        self.0 / 3600
    }

    #[inline]
    pub fn minute(self) -> u32 {
        (self.0 % 3600) / 60
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(self.0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Anchor this time to a calendar date in a timezone.
    ///
    /// Ambiguous local times (DST fold) resolve to the earlier instant;
    /// times skipped by a DST gap return `None`.
    pub fn on(self, date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
        match tz.from_local_datetime(&date.and_time(self.to_naive_time())) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => None,
        }
    }

    /// Parse user input such as `10:30`, `9.45`, `10am`, `1:15 pm`,
    /// `at 10:00`, `в 10:00`, `7 вечера`.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let text = input.trim().to_lowercase();
        let text = text
            .strip_prefix("at ")
            .or_else(|| text.strip_prefix("в "))
            .unwrap_or(&text)
            .trim();
        if text.is_empty() {
            return Err(TimeParseError::Empty);
        }

        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == ':' || c == '.'))
            .unwrap_or(text.len());
        let (numeric, suffix) = text.split_at(split);
        let numeric = numeric.trim_end_matches('.');
        let suffix = suffix.trim();

        let malformed = || TimeParseError::Malformed(input.trim().to_string());
        let (hour, minute) = match numeric.split_once([':', '.']) {
            Some((h, m)) => {
                if m.len() != 2 {
                    return Err(malformed());
                }
                (
                    h.parse::<u32>().map_err(|_| malformed())?,
                    m.parse::<u32>().map_err(|_| malformed())?,
                )
            }
            None => (numeric.parse::<u32>().map_err(|_| malformed())?, 0),
        };

        let out_of_range = || TimeParseError::OutOfRange(input.trim().to_string());
        let hour = match suffix {
            "" => hour,
            "am" | "a.m." | "утра" | "ночи" => {
                if !(1..=12).contains(&hour) {
                    return Err(out_of_range());
                }
                hour % 12
            }
            "pm" | "p.m." | "вечера" | "дня" => {
                if !(1..=12).contains(&hour) {
                    return Err(out_of_range());
                }
                hour % 12 + 12
            }
            _ => return Err(malformed()),
        };

        let time = Self::from_hm(hour, minute).ok_or_else(out_of_range)?;
        if time.0 == 0 {
            return Err(TimeParseError::Midnight);
        }
        Ok(time)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn hm(t: TimeOfDay) -> (u32, u32) {
        (t.hour(), t.minute())
    }

    #[test]
    fn test_parse_24h() {
        assert_eq!(hm(TimeOfDay::parse("10:30").unwrap()), (10, 30));
        assert_eq!(hm(TimeOfDay::parse("9.45").unwrap()), (9, 45));
        assert_eq!(hm(TimeOfDay::parse("at 18:05").unwrap()), (18, 5));
        assert_eq!(hm(TimeOfDay::parse("в 7:00").unwrap()), (7, 0));
        assert_eq!(hm(TimeOfDay::parse("14").unwrap()), (14, 0));
    }

    #[test]
    fn test_parse_12h() {
        assert_eq!(hm(TimeOfDay::parse("10am").unwrap()), (10, 0));
        assert_eq!(hm(TimeOfDay::parse("1:15pm").unwrap()), (13, 15));
        assert_eq!(hm(TimeOfDay::parse("12 pm").unwrap()), (12, 0));
        assert_eq!(hm(TimeOfDay::parse("7 вечера").unwrap()), (19, 0));
        assert_eq!(hm(TimeOfDay::parse("9 утра").unwrap()), (9, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(TimeOfDay::parse(""), Err(TimeParseError::Empty));
        assert!(matches!(TimeOfDay::parse("noon"), Err(TimeParseError::Malformed(_))));
        assert!(matches!(TimeOfDay::parse("10:3"), Err(TimeParseError::Malformed(_))));
        assert!(matches!(TimeOfDay::parse("25:00"), Err(TimeParseError::OutOfRange(_))));
        assert!(matches!(TimeOfDay::parse("13pm"), Err(TimeParseError::OutOfRange(_))));
        assert_eq!(TimeOfDay::parse("00:00"), Err(TimeParseError::Midnight));
        assert_eq!(TimeOfDay::parse("12am"), Err(TimeParseError::Midnight));
    }

    #[test]
    fn test_parse_error_messages() {
        let err = TimeOfDay::parse(" 25:00 ").unwrap_err();
        assert_eq!(err.to_string(), "time out of range: 25:00");
        let boxed: Box<dyn std::error::Error> = Box::new(TimeParseError::Midnight);
        assert_eq!(boxed.to_string(), "midnight cannot be used");
    }

    #[test]
    fn test_storage_values() {
        let t = TimeOfDay::parse("10:30").unwrap();
        assert_eq!(t.seconds(), 37_800);
        assert_eq!(TimeOfDay::from_seconds(37_800), Some(t));
        assert_eq!(TimeOfDay::from_seconds(0), None);
        assert_eq!(TimeOfDay::from_seconds(90_000), None);
        assert_eq!(t.to_string(), "10:30");
    }

    #[test]
    fn test_anchor_in_timezone() {
        let t = TimeOfDay::parse("10:30").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let dt = t.on(date, chrono_tz::Asia::Bishkek).unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.naive_utc().hour(), 4);
    }
}
