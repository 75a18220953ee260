//! TimeTable entity - personal per-weekday deadlines of a standuper

use chrono::Weekday;

use crate::value_objects::TimeOfDay;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTable {
    pub id: i64,
    pub standuper_id: i64,
    pub channel_id: String,
    pub user_id: String,
    /// Indexed Monday first; `None` means the channel deadline applies
    pub days: [Option<TimeOfDay>; 7],
}

impl TimeTable {
    pub fn new(standuper_id: i64, channel_id: String, user_id: String) -> Self {
        Self {
            id: 0,
            standuper_id,
            channel_id,
            user_id,
            days: [None; 7],
        }
    }

    #[inline]
    pub fn time_on(&self, day: Weekday) -> Option<TimeOfDay> {
        self.days[day.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, day: Weekday, time: Option<TimeOfDay>) {
        self.days[day.num_days_from_monday() as usize] = time;
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }

    /// `(weekday, time)` pairs that carry an override, Monday first
    pub fn entries(&self) -> Vec<(Weekday, TimeOfDay)> {
        let mut day = Weekday::Mon;
        self.days
            .iter()
            .filter_map(|slot| {
                let current = day;
                day = day.succ();
                slot.map(|time| (current, time))
            })
            .collect()
    }
}
