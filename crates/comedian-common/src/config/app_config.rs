//! Application configuration structs
//!
//! Loads configuration from environment variables. Every variable the bot
//! cannot run without is required; a missing or unparsable one aborts
//! startup with a [`ConfigError`].

use comedian_core::TimeOfDay;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub slack: SlackConfig,
    pub bot: BotDefaults,
    pub collector: CollectorConfig,
    pub rate_limit: RateLimitConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration for the slash-command endpoint
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Slack credentials
#[derive(Clone)]
pub struct SlackConfig {
    /// `xoxb-` token used for Web API calls
    pub bot_token: String,
    /// `xapp-` token used to open Socket Mode connections
    pub app_token: String,
    /// Token Slack sends along with every slash command
    pub verification_token: String,
    pub api_base_url: String,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &"***")
            .field("app_token", &"***")
            .field("verification_token", &"***")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Scheduling and reporting settings applied to a workspace on startup
#[derive(Debug, Clone)]
pub struct BotDefaults {
    /// Seconds between notifier ticks
    pub notifier_interval: u64,
    pub reminder_repeats_max: i32,
    /// Minutes between repeat reminders
    pub reminder_time: i64,
    /// Minutes before the deadline the warning goes out
    pub reminder_offset: i64,
    pub reporting_channel: String,
    pub report_time: TimeOfDay,
    pub language: String,
    pub individual_reports_on: bool,
    pub timezone: String,
}

/// Optional Collector analytics service
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl CollectorConfig {
    /// Both URL and token are needed to talk to the Collector
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.url.is_some() && self.token.is_some()
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

// Default value functions
fn default_app_name() -> String {
    "comedian".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_slack_api_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_collector_timeout() -> u64 {
    10
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Fetch a required variable, treating blank values as missing
fn required(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

fn required_parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<T, ConfigError> {
    let raw = required(lookup, key)?;
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key, raw))
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn optional_parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    optional(lookup, key).and_then(|s| s.trim().parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let report_time_raw = required(&lookup, "REPORT_TIME")?;
        let report_time = TimeOfDay::parse(&report_time_raw)
            .map_err(|_| ConfigError::InvalidValue("REPORT_TIME", report_time_raw))?;

        let timezone = optional(&lookup, "DEFAULT_TIMEZONE").unwrap_or_else(default_timezone);
        if timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::InvalidValue("DEFAULT_TIMEZONE", timezone));
        }

        let language = required(&lookup, "LANGUAGE")?;
        if !matches!(language.as_str(), "en" | "ru") {
            return Err(ConfigError::InvalidValue("LANGUAGE", language));
        }

        Ok(Self {
            app: AppSettings {
                name: optional(&lookup, "APP_NAME").unwrap_or_else(default_app_name),
                env: optional(&lookup, "APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: optional(&lookup, "API_HOST").unwrap_or_else(default_host),
                port: required_parse(&lookup, "API_PORT")?,
            },
            database: DatabaseConfig {
                url: required(&lookup, "DATABASE_URL")?,
                max_connections: optional_parse(&lookup, "DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(default_max_connections),
                min_connections: optional_parse(&lookup, "DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(default_min_connections),
            },
            slack: SlackConfig {
                bot_token: required(&lookup, "SLACK_BOT_TOKEN")?,
                app_token: required(&lookup, "SLACK_APP_TOKEN")?,
                verification_token: required(&lookup, "SLACK_VERIFICATION_TOKEN")?,
                api_base_url: optional(&lookup, "SLACK_API_URL")
                    .unwrap_or_else(default_slack_api_url),
            },
            bot: BotDefaults {
                notifier_interval: required_parse(&lookup, "NOTIFIER_INTERVAL")?,
                reminder_repeats_max: required_parse(&lookup, "REMINDER_REPEATS_MAX")?,
                reminder_time: required_parse(&lookup, "REMINDER_TIME")?,
                reminder_offset: required_parse(&lookup, "REMINDER_OFFSET")?,
                reporting_channel: required(&lookup, "REPORTING_CHANNEL")?,
                report_time,
                language,
                individual_reports_on: optional_parse(&lookup, "INDIVIDUAL_REPORTS_ON")
                    .unwrap_or(false),
                timezone,
            },
            collector: CollectorConfig {
                url: optional(&lookup, "COLLECTOR_URL")
                    .map(|u| u.trim_end_matches('/').to_string()),
                token: optional(&lookup, "COLLECTOR_TOKEN"),
                timeout_secs: optional_parse(&lookup, "COLLECTOR_TIMEOUT_SECS")
                    .unwrap_or_else(default_collector_timeout),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: optional_parse(&lookup, "RATE_LIMIT_REQUESTS_PER_SECOND")
                    .unwrap_or_else(default_requests_per_second),
                burst: optional_parse(&lookup, "RATE_LIMIT_BURST").unwrap_or_else(default_burst),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
