//! TimeTable entity <-> model mapper

use comedian_core::entities::TimeTable;
use comedian_core::value_objects::TimeOfDay;

use super::channel::time_to_column;
use crate::models::TimeTableModel;

/// Weekday column values Monday first
pub fn days_to_columns(timetable: &TimeTable) -> [i32; 7] {
    timetable.days.map(time_to_column)
}

impl From<TimeTableModel> for TimeTable {
    fn from(model: TimeTableModel) -> Self {
        TimeTable {
            id: model.id,
            standuper_id: model.standuper_id,
            days: model.days().map(|s| TimeOfDay::from_seconds(i64::from(s))),
            channel_id: model.channel_id,
            user_id: model.user_id,
        }
    }
}
