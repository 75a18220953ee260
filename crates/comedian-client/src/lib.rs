//! # comedian-client
//!
//! Outbound HTTP clients: the Slack Web API (implements
//! [`comedian_core::traits::ChatGateway`]) and the Collector analytics
//! service (implements [`comedian_core::traits::Collector`]).

pub mod collector;
pub mod error;
pub mod slack;

pub use collector::CollectorClient;
pub use error::{ClientError, ClientResult};
pub use slack::{AuthInfo, SlackClient, DEFAULT_API_URL};
