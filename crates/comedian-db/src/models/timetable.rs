//! Timetable database model

use sqlx::FromRow;

/// Database model for timetables table; weekday columns hold seconds
/// since local midnight, 0 when there is no override
#[derive(Debug, Clone, FromRow)]
pub struct TimeTableModel {
    pub id: i64,
    pub standuper_id: i64,
    pub channel_id: String,
    pub user_id: String,
    pub monday: i32,
    pub tuesday: i32,
    pub wednesday: i32,
    pub thursday: i32,
    pub friday: i32,
    pub saturday: i32,
    pub sunday: i32,
}

impl TimeTableModel {
    /// Weekday columns Monday first
    pub fn days(&self) -> [i32; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
    }
}
