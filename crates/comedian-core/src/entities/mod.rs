//! Domain entities - core business objects

mod attachment;
mod bot_settings;
mod channel;
mod notification_thread;
mod standup;
mod standuper;
mod timetable;
mod user;

pub use attachment::{Attachment, AttachmentColor};
pub use bot_settings::BotSettings;
pub use channel::{start_of_day, Channel, DEFAULT_TIMEZONE};
pub use notification_thread::NotificationThread;
pub use standup::Standup;
pub use standuper::Standuper;
pub use timetable::TimeTable;
pub use user::{User, UserRole, WorkspaceMember};
