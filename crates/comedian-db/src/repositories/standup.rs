//! PostgreSQL implementation of StandupRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use comedian_core::entities::Standup;
use comedian_core::error::DomainError;
use comedian_core::traits::{RepoResult, StandupQuery, StandupRepository};

use crate::models::StandupModel;

use super::error::{map_db_error, map_unique_violation, standup_not_found};

/// PostgreSQL implementation of StandupRepository
#[derive(Clone)]
pub struct PgStandupRepository {
    pool: PgPool,
}

impl PgStandupRepository {
    /// Create a new PgStandupRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StandupRepository for PgStandupRepository {
    #[instrument(skip(self, standup), fields(user_id = %standup.user_id, channel_id = %standup.channel_id))]
    async fn create(&self, standup: &Standup) -> RepoResult<Standup> {
        let result = sqlx::query_as::<_, StandupModel>(
            r"
            INSERT INTO standups (team_id, channel_id, user_id, comment, message_ts,
                                  created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, team_id, channel_id, user_id, comment, message_ts,
                      created_at, modified_at
            ",
        )
        .bind(&standup.team_id)
        .bind(&standup.channel_id)
        .bind(&standup.user_id)
        .bind(&standup.comment)
        .bind(&standup.message_ts)
        .bind(standup.created_at)
        .bind(standup.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::StandupAlreadySubmitted))?;

        Ok(Standup::from(result))
    }

    #[instrument(skip(self, standup), fields(message_ts = %standup.message_ts))]
    async fn update(&self, standup: &Standup) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE standups
            SET comment = $3, modified_at = $4
            WHERE channel_id = $1 AND message_ts = $2
            ",
        )
        .bind(&standup.channel_id)
        .bind(&standup.message_ts)
        .bind(&standup.comment)
        .bind(standup.modified_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(standup_not_found(&standup.message_ts));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_message_ts(
        &self,
        channel_id: &str,
        ts: &str,
    ) -> RepoResult<Option<Standup>> {
        let result = sqlx::query_as::<_, StandupModel>(
            r"
            SELECT id, team_id, channel_id, user_id, comment, message_ts, created_at, modified_at
            FROM standups
            WHERE channel_id = $1 AND message_ts = $2
            ",
        )
        .bind(channel_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Standup::from))
    }

    #[instrument(skip(self))]
    async fn delete_by_message_ts(&self, channel_id: &str, ts: &str) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM standups WHERE channel_id = $1 AND message_ts = $2")
            .bind(channel_id)
            .bind(ts)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(standup_not_found(ts));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_submitted(
        &self,
        user_id: &str,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Option<Standup>> {
        let result = sqlx::query_as::<_, StandupModel>(
            r"
            SELECT id, team_id, channel_id, user_id, comment, message_ts, created_at, modified_at
            FROM standups
            WHERE user_id = $1 AND channel_id = $2 AND created_at >= $3 AND created_at < $4
            ORDER BY created_at
            LIMIT 1
            ",
        )
        .bind(user_id)
        .bind(channel_id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Standup::from))
    }

    #[instrument(skip(self))]
    async fn submitted_user_ids(
        &self,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<String>> {
        let results = sqlx::query_scalar::<_, String>(
            r"
            SELECT DISTINCT user_id
            FROM standups
            WHERE channel_id = $1 AND created_at >= $2 AND created_at < $3
            ",
        )
        .bind(channel_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &StandupQuery) -> RepoResult<Vec<Standup>> {
        let results = sqlx::query_as::<_, StandupModel>(
            r"
            SELECT id, team_id, channel_id, user_id, comment, message_ts, created_at, modified_at
            FROM standups
            WHERE ($1::TEXT IS NULL OR team_id = $1)
              AND ($2::TEXT IS NULL OR user_id = $2)
              AND ($3::TEXT IS NULL OR channel_id = $3)
              AND created_at >= $4 AND created_at < $5
            ORDER BY created_at, id
            ",
        )
        .bind(query.team_id.as_deref())
        .bind(query.user_id.as_deref())
        .bind(query.channel_id.as_deref())
        .bind(query.from)
        .bind(query.to)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Standup::from).collect())
    }
}
