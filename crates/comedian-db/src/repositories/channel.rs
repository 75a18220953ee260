//! PostgreSQL implementation of ChannelRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use comedian_core::entities::Channel;
use comedian_core::error::DomainError;
use comedian_core::traits::{ChannelRepository, RepoResult};

use crate::mappers::time_to_column;
use crate::models::ChannelModel;

use super::error::{channel_not_found, map_db_error, map_unique_violation};

/// PostgreSQL implementation of ChannelRepository
#[derive(Clone)]
pub struct PgChannelRepository {
    pool: PgPool,
}

impl PgChannelRepository {
    /// Create a new PgChannelRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelRepository for PgChannelRepository {
    #[instrument(skip(self))]
    async fn find_by_channel_id(&self, channel_id: &str) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(
            r"
            SELECT id, team_id, channel_id, channel_name, standup_deadline, submission_days,
                   timezone, created_at
            FROM channels
            WHERE channel_id = $1
            ",
        )
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Channel::from))
    }

    #[instrument(skip(self))]
    async fn list_by_team(&self, team_id: &str) -> RepoResult<Vec<Channel>> {
        let results = sqlx::query_as::<_, ChannelModel>(
            r"
            SELECT id, team_id, channel_id, channel_name, standup_deadline, submission_days,
                   timezone, created_at
            FROM channels
            WHERE team_id = $1
            ORDER BY id
            ",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Channel::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_active(&self, team_id: &str) -> RepoResult<Vec<Channel>> {
        let results = sqlx::query_as::<_, ChannelModel>(
            r"
            SELECT id, team_id, channel_id, channel_name, standup_deadline, submission_days,
                   timezone, created_at
            FROM channels
            WHERE team_id = $1 AND standup_deadline > 0
            ORDER BY id
            ",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Channel::from).collect())
    }

    #[instrument(skip(self, channel), fields(channel_id = %channel.channel_id))]
    async fn create(&self, channel: &Channel) -> RepoResult<Channel> {
        let result = sqlx::query_as::<_, ChannelModel>(
            r"
            INSERT INTO channels (team_id, channel_id, channel_name, standup_deadline,
                                  submission_days, timezone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, team_id, channel_id, channel_name, standup_deadline, submission_days,
                      timezone, created_at
            ",
        )
        .bind(&channel.team_id)
        .bind(&channel.channel_id)
        .bind(&channel.channel_name)
        .bind(time_to_column(channel.standup_deadline))
        .bind(channel.submission_days.to_i16())
        .bind(&channel.timezone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ChannelAlreadyExists(channel.channel_id.clone())
            })
        })?;

        Ok(Channel::from(result))
    }

    #[instrument(skip(self, channel), fields(channel_id = %channel.channel_id))]
    async fn update(&self, channel: &Channel) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE channels
            SET channel_name = $2, standup_deadline = $3, submission_days = $4, timezone = $5
            WHERE channel_id = $1
            ",
        )
        .bind(&channel.channel_id)
        .bind(&channel.channel_name)
        .bind(time_to_column(channel.standup_deadline))
        .bind(channel.submission_days.to_i16())
        .bind(&channel.timezone)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(channel_not_found(&channel.channel_id));
        }

        Ok(())
    }

    /// Standupers, their timetables and the notification thread go with the
    /// channel through `ON DELETE CASCADE`
    #[instrument(skip(self))]
    async fn delete(&self, channel_id: &str) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM channels WHERE channel_id = $1")
            .bind(channel_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(channel_not_found(channel_id));
        }

        Ok(())
    }
}
