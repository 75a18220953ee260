//! # comedian-service
//!
//! Application layer: standup intake, slash commands, deadline reminders
//! and reports, plus the DTOs the HTTP surface speaks.

pub mod dto;
pub mod services;

pub use services::{ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
