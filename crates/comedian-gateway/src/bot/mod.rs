//! Per-workspace bot runtime and the registry of running bots

mod registry;
mod runtime;

pub use registry::{BotHandle, BotRegistry};
pub use runtime::{report_due, Bot, MinuteGate, USER_SYNC_INTERVAL};
