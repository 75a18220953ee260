//! Business logic services
//!
//! Every service borrows a [`ServiceContext`] for the repositories, the chat
//! gateway and the optional collector, and most also take the
//! [`BotSettings`](comedian_core::entities::BotSettings) of the workspace they act for.

pub mod classifier;
pub mod commands;
pub mod context;
pub mod error;
pub mod events;
pub mod notifier;
pub mod parsing;
pub mod reporting;
pub mod roster;
pub mod standup;

#[cfg(test)]
mod testing;

pub use classifier::{check_standup, classify, KeywordCategory};
pub use commands::{route, Command, CommandService, UMBRELLA_COMMAND};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use events::EventService;
pub use notifier::{minute_of, ChannelAction, ChannelTick, NotifierService};
pub use reporting::{Report, ReportKind, ReportingService};
pub use roster::{RosterService, SyncSummary};
pub use standup::{StandupService, SubmissionOutcome};
