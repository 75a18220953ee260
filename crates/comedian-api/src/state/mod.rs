//! Application state
//!
//! Holds the service context, the database pool used by the readiness probe
//! and the configuration.

use std::sync::Arc;

use comedian_common::AppConfig;
use comedian_db::PgPool;
use comedian_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    pool: PgPool,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, pool: PgPool, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            pool,
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Token Slack sends with every slash command
    pub fn verification_token(&self) -> &str {
        &self.config.slack.verification_token
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("config", &"AppConfig")
            .finish()
    }
}
