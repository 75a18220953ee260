//! PostgreSQL implementation of NotificationThreadRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use comedian_core::entities::NotificationThread;
use comedian_core::error::DomainError;
use comedian_core::traits::{NotificationThreadRepository, RepoResult};

use crate::models::NotificationThreadModel;

use super::error::map_db_error;

/// PostgreSQL implementation of NotificationThreadRepository
#[derive(Clone)]
pub struct PgNotificationThreadRepository {
    pool: PgPool,
}

impl PgNotificationThreadRepository {
    /// Create a new PgNotificationThreadRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationThreadRepository for PgNotificationThreadRepository {
    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: &str) -> RepoResult<Option<NotificationThread>> {
        let result = sqlx::query_as::<_, NotificationThreadModel>(
            r"
            SELECT id, channel_id, user_ids, notification_time, reminder_counter
            FROM notification_threads
            WHERE channel_id = $1
            ",
        )
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(NotificationThread::from))
    }

    /// A leftover thread for the same channel is replaced
    #[instrument(skip(self, thread), fields(channel_id = %thread.channel_id))]
    async fn create(&self, thread: &NotificationThread) -> RepoResult<NotificationThread> {
        let result = sqlx::query_as::<_, NotificationThreadModel>(
            r"
            INSERT INTO notification_threads (channel_id, user_ids, notification_time,
                                              reminder_counter)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (channel_id) DO UPDATE
            SET user_ids = EXCLUDED.user_ids,
                notification_time = EXCLUDED.notification_time,
                reminder_counter = EXCLUDED.reminder_counter
            RETURNING id, channel_id, user_ids, notification_time, reminder_counter
            ",
        )
        .bind(&thread.channel_id)
        .bind(thread.joined_user_ids())
        .bind(thread.notification_time)
        .bind(thread.reminder_counter)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(NotificationThread::from(result))
    }

    #[instrument(skip(self, thread), fields(id = thread.id))]
    async fn update(&self, thread: &NotificationThread) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE notification_threads
            SET user_ids = $2, notification_time = $3, reminder_counter = $4
            WHERE id = $1
            ",
        )
        .bind(thread.id)
        .bind(thread.joined_user_ids())
        .bind(thread.notification_time)
        .bind(thread.reminder_counter)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotificationThreadNotFound(thread.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM notification_threads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotificationThreadNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_channel(&self, channel_id: &str) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM notification_threads WHERE channel_id = $1")
            .bind(channel_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
