//! Integration test utilities for Comedian
//!
//! Helpers for running end-to-end tests against the slash-command server
//! and the bot runtime, backed by a real PostgreSQL database and a mocked
//! Slack Web API.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
