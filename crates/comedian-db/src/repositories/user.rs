//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use comedian_core::entities::User;
use comedian_core::traits::{RepoResult, UserRepository};

use crate::models::UserModel;

use super::error::{map_db_error, user_not_found};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find(&self, team_id: &str, user_id: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, team_id, user_id, user_name, real_name, role, tz
            FROM users
            WHERE team_id = $1 AND user_id = $2
            ",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn list_by_team(&self, team_id: &str) -> RepoResult<Vec<User>> {
        let results = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, team_id, user_id, user_name, real_name, role, tz
            FROM users
            WHERE team_id = $1
            ORDER BY user_name
            ",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    async fn upsert(&self, user: &User) -> RepoResult<User> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (team_id, user_id, user_name, real_name, role, tz)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (team_id, user_id) DO UPDATE
            SET user_name = EXCLUDED.user_name,
                real_name = EXCLUDED.real_name,
                role = EXCLUDED.role,
                tz = EXCLUDED.tz
            RETURNING id, team_id, user_id, user_name, real_name, role, tz
            ",
        )
        .bind(&user.team_id)
        .bind(&user.user_id)
        .bind(&user.user_name)
        .bind(&user.real_name)
        .bind(user.role.as_str())
        .bind(&user.tz)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(User::from(result))
    }

    #[instrument(skip(self))]
    async fn delete(&self, team_id: &str, user_id: &str) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }

        Ok(())
    }
}
