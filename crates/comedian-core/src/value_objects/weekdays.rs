//! Submission days bitflags
//!
//! Stored as SMALLINT in the database. Bit 0 is Monday, bit 6 is Sunday,
//! matching `chrono::Weekday::num_days_from_monday`.

use bitflags::bitflags;
use chrono::Weekday;

bitflags! {
    /// Weekdays on which a channel expects standups
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SubmissionDays: u8 {
        const MONDAY    = 1 << 0;
        const TUESDAY   = 1 << 1;
        const WEDNESDAY = 1 << 2;
        const THURSDAY  = 1 << 3;
        const FRIDAY    = 1 << 4;
        const SATURDAY  = 1 << 5;
        const SUNDAY    = 1 << 6;

        const WORKDAYS = Self::MONDAY.bits()
            | Self::TUESDAY.bits()
            | Self::WEDNESDAY.bits()
            | Self::THURSDAY.bits()
            | Self::FRIDAY.bits();

        const EVERY_DAY = Self::WORKDAYS.bits()
            | Self::SATURDAY.bits()
            | Self::SUNDAY.bits();
    }
}

const ORDER: [(Weekday, SubmissionDays, &str); 7] = [
    (Weekday::Mon, SubmissionDays::MONDAY, "monday"),
    (Weekday::Tue, SubmissionDays::TUESDAY, "tuesday"),
    (Weekday::Wed, SubmissionDays::WEDNESDAY, "wednesday"),
    (Weekday::Thu, SubmissionDays::THURSDAY, "thursday"),
    (Weekday::Fri, SubmissionDays::FRIDAY, "friday"),
    (Weekday::Sat, SubmissionDays::SATURDAY, "saturday"),
    (Weekday::Sun, SubmissionDays::SUNDAY, "sunday"),
];

impl Default for SubmissionDays {
    fn default() -> Self {
        Self::WORKDAYS
    }
}

impl SubmissionDays {
    pub fn from_weekday(day: Weekday) -> Self {
        Self::from_bits_truncate(1 << day.num_days_from_monday())
    }

    #[inline]
    pub fn includes(&self, day: Weekday) -> bool {
        self.contains(Self::from_weekday(day))
    }

    #[inline]
    pub fn to_i16(self) -> i16 {
        i16::from(self.bits())
    }

    #[inline]
    pub fn from_i16(bits: i16) -> Self {
        Self::from_bits_truncate(bits as u8)
    }

    /// Parse a list of day names separated by spaces or commas.
    ///
    /// Returns the first unrecognised token as the error.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut days = Self::empty();
        for token in text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            match parse_weekday(token) {
                Some(day) => days |= Self::from_weekday(day),
                None => return Err(token.to_string()),
            }
        }
        Ok(days)
    }

    /// Lower-case English names in week order
    pub fn names(&self) -> Vec<&'static str> {
        ORDER
            .iter()
            .filter(|(_, flag, _)| self.contains(*flag))
            .map(|(_, _, name)| *name)
            .collect()
    }

    pub fn weekdays(&self) -> Vec<Weekday> {
        ORDER
            .iter()
            .filter(|(_, flag, _)| self.contains(*flag))
            .map(|(day, _, _)| *day)
            .collect()
    }
}

/// Recognise English and Russian day names, full or abbreviated
pub fn parse_weekday(token: &str) -> Option<Weekday> {
    let token = token.trim().trim_end_matches('.').to_lowercase();
    let day = match token.as_str() {
        "mon" | "monday" | "пн" | "понедельник" => Weekday::Mon,
        "tue" | "tues" | "tuesday" | "вт" | "вторник" => Weekday::Tue,
        "wed" | "wednesday" | "ср" | "среда" | "среду" => Weekday::Wed,
        "thu" | "thur" | "thurs" | "thursday" | "чт" | "четверг" => Weekday::Thu,
        "fri" | "friday" | "пт" | "пятница" | "пятницу" => Weekday::Fri,
        "sat" | "saturday" | "сб" | "суббота" | "субботу" => Weekday::Sat,
        "sun" | "sunday" | "вс" | "воскресенье" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_workdays() {
        let days = SubmissionDays::default();
        assert!(days.includes(Weekday::Mon));
        assert!(days.includes(Weekday::Fri));
        assert!(!days.includes(Weekday::Sat));
        assert!(!days.includes(Weekday::Sun));
    }

    #[test]
    fn test_parse_mixed_languages() {
        let days = SubmissionDays::parse("mon, wed пт").unwrap();
        assert_eq!(
            days,
            SubmissionDays::MONDAY | SubmissionDays::WEDNESDAY | SubmissionDays::FRIDAY
        );
        assert_eq!(days.names(), vec!["monday", "wednesday", "friday"]);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(SubmissionDays::parse("mon someday"), Err("someday".to_string()));
    }

    #[test]
    fn test_i16_round_trip() {
        let days = SubmissionDays::SATURDAY | SubmissionDays::SUNDAY;
        assert_eq!(SubmissionDays::from_i16(days.to_i16()), days);
        assert_eq!(SubmissionDays::WORKDAYS.to_i16(), 31);
    }
}
