//! PostgreSQL implementation of StanduperRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use comedian_core::entities::Standuper;
use comedian_core::error::DomainError;
use comedian_core::traits::{RepoResult, StanduperRepository};

use crate::models::StanduperModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of StanduperRepository
#[derive(Clone)]
pub struct PgStanduperRepository {
    pool: PgPool,
}

impl PgStanduperRepository {
    /// Create a new PgStanduperRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StanduperRepository for PgStanduperRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: &str, channel_id: &str) -> RepoResult<Option<Standuper>> {
        let result = sqlx::query_as::<_, StanduperModel>(
            r"
            SELECT id, team_id, user_id, channel_id, role_in_channel, created_at
            FROM standupers
            WHERE user_id = $1 AND channel_id = $2
            ",
        )
        .bind(user_id)
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Standuper::from))
    }

    #[instrument(skip(self))]
    async fn list_by_channel(&self, channel_id: &str) -> RepoResult<Vec<Standuper>> {
        let results = sqlx::query_as::<_, StanduperModel>(
            r"
            SELECT id, team_id, user_id, channel_id, role_in_channel, created_at
            FROM standupers
            WHERE channel_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Standuper::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, team_id: &str, user_id: &str) -> RepoResult<Vec<Standuper>> {
        let results = sqlx::query_as::<_, StanduperModel>(
            r"
            SELECT id, team_id, user_id, channel_id, role_in_channel, created_at
            FROM standupers
            WHERE team_id = $1 AND user_id = $2
            ORDER BY created_at, id
            ",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Standuper::from).collect())
    }

    #[instrument(skip(self, standuper), fields(user_id = %standuper.user_id, channel_id = %standuper.channel_id))]
    async fn create(&self, standuper: &Standuper) -> RepoResult<Standuper> {
        let result = sqlx::query_as::<_, StanduperModel>(
            r"
            INSERT INTO standupers (team_id, user_id, channel_id, role_in_channel)
            VALUES ($1, $2, $3, $4)
            RETURNING id, team_id, user_id, channel_id, role_in_channel, created_at
            ",
        )
        .bind(&standuper.team_id)
        .bind(&standuper.user_id)
        .bind(&standuper.channel_id)
        .bind(standuper.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::StanduperAlreadyExists {
                user_id: standuper.user_id.clone(),
                channel_id: standuper.channel_id.clone(),
            })
        })?;

        Ok(Standuper::from(result))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM standupers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::StanduperIdNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_user(&self, team_id: &str, user_id: &str) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM standupers WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
