//! Entity <-> model mappers
//!
//! - `From<Model> for Entity`: convert database rows to domain objects
//! - helper functions: encode entity fields into column values

mod bot_settings;
mod channel;
mod notification_thread;
mod standup;
mod standuper;
mod timetable;
mod user;

pub use channel::time_to_column;
pub use timetable::days_to_columns;
