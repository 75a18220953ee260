//! PostgreSQL implementation of BotSettingsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use comedian_core::entities::BotSettings;
use comedian_core::traits::{BotSettingsRepository, RepoResult};

use crate::models::BotSettingsModel;

use super::error::map_db_error;

const COLUMNS: &str = "id, team_id, team_name, bot_user_id, bot_access_token, language, \
     notifier_interval, reminder_repeats_max, reminder_time, reminder_offset, \
     reporting_channel, report_time, individual_reports_on, timezone, created_at, updated_at";

/// PostgreSQL implementation of BotSettingsRepository
#[derive(Clone)]
pub struct PgBotSettingsRepository {
    pool: PgPool,
}

impl PgBotSettingsRepository {
    /// Create a new PgBotSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BotSettingsRepository for PgBotSettingsRepository {
    #[instrument(skip(self))]
    async fn find_by_team(&self, team_id: &str) -> RepoResult<Option<BotSettings>> {
        let result = sqlx::query_as::<_, BotSettingsModel>(&format!(
            "SELECT {COLUMNS} FROM bot_settings WHERE team_id = $1"
        ))
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(BotSettings::from))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<BotSettings>> {
        let results = sqlx::query_as::<_, BotSettingsModel>(&format!(
            "SELECT {COLUMNS} FROM bot_settings ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(BotSettings::from).collect())
    }

    #[instrument(skip(self, settings), fields(team_id = %settings.team_id))]
    async fn upsert(&self, settings: &BotSettings) -> RepoResult<BotSettings> {
        let result = sqlx::query_as::<_, BotSettingsModel>(&format!(
            r"
            INSERT INTO bot_settings (team_id, team_name, bot_user_id, bot_access_token, language,
                                      notifier_interval, reminder_repeats_max, reminder_time,
                                      reminder_offset, reporting_channel, report_time,
                                      individual_reports_on, timezone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (team_id) DO UPDATE
            SET team_name = EXCLUDED.team_name,
                bot_user_id = EXCLUDED.bot_user_id,
                bot_access_token = EXCLUDED.bot_access_token,
                language = EXCLUDED.language,
                notifier_interval = EXCLUDED.notifier_interval,
                reminder_repeats_max = EXCLUDED.reminder_repeats_max,
                reminder_time = EXCLUDED.reminder_time,
                reminder_offset = EXCLUDED.reminder_offset,
                reporting_channel = EXCLUDED.reporting_channel,
                report_time = EXCLUDED.report_time,
                individual_reports_on = EXCLUDED.individual_reports_on,
                timezone = EXCLUDED.timezone,
                updated_at = NOW()
            RETURNING {COLUMNS}
            "
        ))
        .bind(&settings.team_id)
        .bind(&settings.team_name)
        .bind(&settings.bot_user_id)
        .bind(&settings.bot_access_token)
        .bind(&settings.language)
        .bind(settings.notifier_interval)
        .bind(settings.reminder_repeats_max)
        .bind(settings.reminder_time)
        .bind(settings.reminder_offset)
        .bind(&settings.reporting_channel)
        .bind(settings.report_time.seconds() as i32)
        .bind(settings.individual_reports_on)
        .bind(&settings.timezone)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(BotSettings::from(result))
    }
}
