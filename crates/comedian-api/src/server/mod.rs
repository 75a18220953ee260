//! Server setup and initialization

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use comedian_client::{CollectorClient, SlackClient};
use comedian_common::{AppConfig, AppError, Translator};
use comedian_core::traits::Collector;
use comedian_db::{
    create_pool, migrations_dir, run_migrations, PgBotSettingsRepository, PgChannelRepository,
    PgNotificationThreadRepository, PgPool, PgStandupRepository, PgStanduperRepository,
    PgTimeTableRepository, PgUserRepository, PoolConfig,
};
use comedian_service::{ServiceContext, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let commands = apply_rate_limit(create_router(), &state.config().rate_limit)?;
    let router = apply_middleware(commands.merge(health_routes()));
    Ok(router.with_state(state))
}

/// Wire the PostgreSQL repositories, the Slack client and the Collector
pub fn build_service_context(pool: &PgPool, config: &AppConfig) -> Result<ServiceContext, AppError> {
    let slack = SlackClient::new(&config.slack.api_base_url, &config.slack.bot_token)
        .map_err(|e| AppError::Config(e.to_string()))?;
    let collector = CollectorClient::from_config(&config.collector)
        .map_err(|e| AppError::Config(e.to_string()))?
        .map(|c| Arc::new(c) as Arc<dyn Collector>);
    let translator = Translator::new().map_err(|e| AppError::Config(e.to_string()))?;

    ServiceContextBuilder::new()
        .bot_settings_repo(Arc::new(PgBotSettingsRepository::new(pool.clone())))
        .channel_repo(Arc::new(PgChannelRepository::new(pool.clone())))
        .standuper_repo(Arc::new(PgStanduperRepository::new(pool.clone())))
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .standup_repo(Arc::new(PgStandupRepository::new(pool.clone())))
        .timetable_repo(Arc::new(PgTimeTableRepository::new(pool.clone())))
        .thread_repo(Arc::new(PgNotificationThreadRepository::new(pool.clone())))
        .chat(Arc::new(slack))
        .collector(collector)
        .translator(Arc::new(translator))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool, &migrations_dir())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    let ctx = build_service_context(&pool, &config)?;
    info!(collector = ctx.collector().is_some(), "Service context ready");

    Ok(AppState::new(ctx, pool, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address {}: {e}", config.api.address())))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}
