//! Gateway setup
//!
//! Resolves the workspace identity, stores its settings and starts one bot
//! per workspace with its Socket Mode connection.

use std::sync::Arc;
use std::time::Duration;

use comedian_client::{AuthInfo, CollectorClient, SlackClient};
use comedian_common::{AppConfig, AppError, BotDefaults, Translator};
use comedian_core::entities::BotSettings;
use comedian_core::traits::Collector;
use comedian_db::{
    create_pool, migrations_dir, run_migrations, PgBotSettingsRepository, PgChannelRepository,
    PgNotificationThreadRepository, PgPool, PgStandupRepository, PgStanduperRepository,
    PgTimeTableRepository, PgUserRepository, PoolConfig,
};
use comedian_service::{ServiceContext, ServiceContextBuilder};
use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::bot::{Bot, BotHandle, BotRegistry};
use crate::connection::SocketModeClient;

/// Pause before reopening a dropped Socket Mode connection
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

const EVENT_BUFFER: usize = 256;

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

/// Settings for the workspace behind the bot token.
///
/// Configured defaults win over stored values; the stored row id is kept.
pub fn workspace_settings(
    auth: &AuthInfo,
    bot_token: &str,
    defaults: &BotDefaults,
    existing: Option<&BotSettings>,
) -> BotSettings {
    BotSettings {
        id: existing.map_or(0, |s| s.id),
        team_id: auth.team_id.clone(),
        team_name: auth.team.clone(),
        bot_user_id: auth.user_id.clone(),
        bot_access_token: bot_token.to_string(),
        language: defaults.language.clone(),
        notifier_interval: i32::try_from(defaults.notifier_interval).unwrap_or(i32::MAX),
        reminder_repeats_max: defaults.reminder_repeats_max,
        reminder_time: defaults.reminder_time,
        reminder_offset: defaults.reminder_offset,
        reporting_channel: defaults.reporting_channel.clone(),
        report_time: defaults.report_time,
        individual_reports_on: defaults.individual_reports_on,
        timezone: defaults.timezone.clone(),
    }
}

/// Resolve the workspace through `auth.test` and persist its settings
pub async fn bootstrap_settings(
    ctx: &ServiceContext,
    config: &AppConfig,
) -> Result<BotSettings, AppError> {
    let slack = SlackClient::new(&config.slack.api_base_url, &config.slack.bot_token)
        .map_err(|e| AppError::Config(e.to_string()))?;
    let auth = slack
        .auth_test()
        .await
        .map_err(|e| AppError::Config(format!("auth.test failed: {e}")))?;

    let repo = ctx.bot_settings_repo();
    let existing = repo
        .find_by_team(&auth.team_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    let settings = workspace_settings(
        &auth,
        &config.slack.bot_token,
        &config.bot,
        existing.as_ref(),
    );
    let stored = repo
        .upsert(&settings)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    info!(
        team_id = %stored.team_id,
        team = %stored.team_name,
        bot_user_id = %stored.bot_user_id,
        "Workspace settings stored"
    );
    Ok(stored)
}

/// Spawn the Socket Mode client and the bot runtime for one workspace
pub async fn start_bot(
    registry: &BotRegistry,
    ctx: Arc<ServiceContext>,
    settings: BotSettings,
    config: &AppConfig,
) -> Result<(), AppError> {
    let app_client = SlackClient::new(&config.slack.api_base_url, &config.slack.app_token)
        .map_err(|e| AppError::Config(e.to_string()))?;
    let team_id = settings.team_id.clone();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);

    let socket = SocketModeClient::new(app_client, team_id.clone(), RECONNECT_DELAY);
    let socket_task = tokio::spawn(socket.run(events_tx, shutdown_rx.clone()));
    let bot_task = tokio::spawn(Bot::new(ctx, settings).run(events_rx, shutdown_rx));

    registry
        .register(team_id, BotHandle::new(shutdown_tx, vec![socket_task, bot_task]))
        .await;
    Ok(())
}

/// Run the gateway until interrupted
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool, &migrations_dir())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    let ctx = Arc::new(build_service_context(&pool, &config)?);
    let settings = bootstrap_settings(&ctx, &config).await?;

    let registry = BotRegistry::new();
    start_bot(&registry, ctx, settings, &config).await?;
    info!(bots = registry.len(), "Gateway running");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::Config(format!("Failed to listen for shutdown signal: {e}")))?;

    info!("Shutting down bots...");
    registry.shutdown_all().await;
    pool.close().await;
    Ok(())
}
