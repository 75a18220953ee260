//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BotDefaults, CollectorConfig, ConfigError, DatabaseConfig,
    Environment, RateLimitConfig, ServerConfig, SlackConfig,
};
