//! Data transfer objects for the slash-command surface
//!
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs

pub mod requests;
pub mod responses;

pub use requests::CommandRequest;
pub use responses::{CommandResponse, HealthChecks, HealthResponse, ReadinessResponse};
