//! # comedian-gateway
//!
//! Slack Socket Mode gateway. Receives channel events over WebSocket and
//! runs the per-workspace bot: notifier, reports and user sync.

pub mod bot;
pub mod connection;
pub mod error;
pub mod events;
pub mod protocol;
pub mod server;

pub use error::{GatewayError, GatewayResult};
pub use server::run;
