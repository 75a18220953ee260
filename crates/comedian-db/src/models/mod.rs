//! Database models - SQLx-compatible structs for PostgreSQL tables

mod bot_settings;
mod channel;
mod notification_thread;
mod standup;
mod standuper;
mod timetable;
mod user;

pub use bot_settings::BotSettingsModel;
pub use channel::ChannelModel;
pub use notification_thread::NotificationThreadModel;
pub use standup::StandupModel;
pub use standuper::StanduperModel;
pub use timetable::TimeTableModel;
pub use user::UserModel;
