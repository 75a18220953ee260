//! Ports implemented by the infrastructure crates

mod gateways;
mod repositories;

pub use gateways::{ChatGateway, Collector, CollectorData, CollectorScope};
pub use repositories::{
    BotSettingsRepository, ChannelRepository, NotificationThreadRepository, RepoResult,
    StandupQuery, StandupRepository, StanduperRepository, TimeTableRepository, UserRepository,
};
