//! # comedian-common
//!
//! Shared utilities including configuration, error handling, translations,
//! and telemetry.

pub mod config;
pub mod error;
pub mod i18n;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, BotDefaults, CollectorConfig, ConfigError, DatabaseConfig,
    Environment, RateLimitConfig, ServerConfig, SlackConfig,
};
pub use error::AppError;
pub use i18n::{I18nError, Locale, Localizer, Translator};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
