//! # comedian-core
//!
//! Domain layer containing entities, value objects, repository and gateway
//! traits, and inbound chat events. This crate has zero dependencies on
//! infrastructure (database, HTTP clients, web framework).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

#[cfg(feature = "test-support")]
pub mod mocks;

// Re-export commonly used types at crate root
pub use entities::{
    start_of_day, Attachment, AttachmentColor, BotSettings, Channel, NotificationThread, Standup,
    Standuper, TimeTable, User, UserRole, WorkspaceMember, DEFAULT_TIMEZONE,
};
pub use error::DomainError;
pub use events::ChatEvent;
pub use traits::{
    BotSettingsRepository, ChannelRepository, ChatGateway, Collector, CollectorData,
    CollectorScope, NotificationThreadRepository, RepoResult, StandupQuery, StandupRepository,
    StanduperRepository, TimeTableRepository, UserRepository,
};
pub use value_objects::{AccessLevel, ChannelRole, SubmissionDays, TimeOfDay, TimeParseError};
