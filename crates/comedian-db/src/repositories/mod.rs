//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in comedian-core.
//! Each repository handles database operations for a specific domain entity.

mod bot_settings;
mod channel;
mod error;
mod notification_thread;
mod standup;
mod standuper;
mod timetable;
mod user;

pub use bot_settings::PgBotSettingsRepository;
pub use channel::PgChannelRepository;
pub use notification_thread::PgNotificationThreadRepository;
pub use standup::PgStandupRepository;
pub use standuper::PgStanduperRepository;
pub use timetable::PgTimeTableRepository;
pub use user::PgUserRepository;
