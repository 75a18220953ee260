//! PostgreSQL implementation of TimeTableRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use comedian_core::entities::TimeTable;
use comedian_core::error::DomainError;
use comedian_core::traits::{RepoResult, TimeTableRepository};

use crate::mappers::days_to_columns;
use crate::models::TimeTableModel;

use super::error::map_db_error;

/// PostgreSQL implementation of TimeTableRepository
#[derive(Clone)]
pub struct PgTimeTableRepository {
    pool: PgPool,
}

impl PgTimeTableRepository {
    /// Create a new PgTimeTableRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimeTableRepository for PgTimeTableRepository {
    #[instrument(skip(self))]
    async fn find_by_standuper(&self, standuper_id: i64) -> RepoResult<Option<TimeTable>> {
        let result = sqlx::query_as::<_, TimeTableModel>(
            r"
            SELECT id, standuper_id, channel_id, user_id,
                   monday, tuesday, wednesday, thursday, friday, saturday, sunday
            FROM timetables
            WHERE standuper_id = $1
            ",
        )
        .bind(standuper_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(TimeTable::from))
    }

    #[instrument(skip(self))]
    async fn list_by_channel(&self, channel_id: &str) -> RepoResult<Vec<TimeTable>> {
        let results = sqlx::query_as::<_, TimeTableModel>(
            r"
            SELECT id, standuper_id, channel_id, user_id,
                   monday, tuesday, wednesday, thursday, friday, saturday, sunday
            FROM timetables
            WHERE channel_id = $1
            ORDER BY id
            ",
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(TimeTable::from).collect())
    }

    #[instrument(skip(self, timetable), fields(standuper_id = timetable.standuper_id))]
    async fn save(&self, timetable: &TimeTable) -> RepoResult<TimeTable> {
        let [mon, tue, wed, thu, fri, sat, sun] = days_to_columns(timetable);
        let result = sqlx::query_as::<_, TimeTableModel>(
            r"
            INSERT INTO timetables (standuper_id, channel_id, user_id,
                                    monday, tuesday, wednesday, thursday, friday, saturday, sunday)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (standuper_id) DO UPDATE
            SET monday = EXCLUDED.monday,
                tuesday = EXCLUDED.tuesday,
                wednesday = EXCLUDED.wednesday,
                thursday = EXCLUDED.thursday,
                friday = EXCLUDED.friday,
                saturday = EXCLUDED.saturday,
                sunday = EXCLUDED.sunday
            RETURNING id, standuper_id, channel_id, user_id,
                      monday, tuesday, wednesday, thursday, friday, saturday, sunday
            ",
        )
        .bind(timetable.standuper_id)
        .bind(&timetable.channel_id)
        .bind(&timetable.user_id)
        .bind(mon)
        .bind(tue)
        .bind(wed)
        .bind(thu)
        .bind(fri)
        .bind(sat)
        .bind(sun)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(TimeTable::from(result))
    }

    #[instrument(skip(self))]
    async fn delete_by_standuper(&self, standuper_id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM timetables WHERE standuper_id = $1")
            .bind(standuper_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TimeTableNotFound(standuper_id));
        }

        Ok(())
    }
}
