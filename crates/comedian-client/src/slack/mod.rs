//! Slack Web API

mod client;
mod types;

pub use client::{SlackClient, DEFAULT_API_URL};
pub use types::{AuthInfo, ConnectionUrl};
