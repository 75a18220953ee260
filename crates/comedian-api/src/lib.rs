//! # comedian-api
//!
//! Slash-command HTTP endpoint built with Axum, plus liveness and readiness
//! probes.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::run;
