//! Slack Events API payloads and their translation into chat events

mod slack_event;

pub use slack_event::{EditedMessage, EventCallback, SlackEvent};
