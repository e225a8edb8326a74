//! Shift repository for database operations.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ShiftEntity, ShiftStatusDb, ShiftWithCountEntity};
use crate::metrics::QueryTimer;

/// Repository for shift-related database operations.
#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new shift. New shifts start in the stored `open` state.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: &str,
        shift_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        min_people: i32,
        max_people: i32,
        remarks: Option<&str>,
    ) -> Result<ShiftEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_shift");
        let result = sqlx::query_as::<_, ShiftEntity>(
            r#"
            INSERT INTO bar_shifts (title, shift_date, start_time, end_time, min_people, max_people, remarks)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, shift_date, start_time, end_time, min_people, max_people,
                      remarks, status, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(shift_date)
        .bind(start_time)
        .bind(end_time)
        .bind(min_people)
        .bind(max_people)
        .bind(remarks)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a shift by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ShiftEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_shift_by_id");
        let result = sqlx::query_as::<_, ShiftEntity>(
            r#"
            SELECT id, title, shift_date, start_time, end_time, min_people, max_people,
                   remarks, status, created_at, updated_at
            FROM bar_shifts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a shift by ID with its active registration count.
    pub async fn find_with_count(
        &self,
        id: Uuid,
    ) -> Result<Option<ShiftWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_shift_with_count");
        let result = sqlx::query_as::<_, ShiftWithCountEntity>(
            r#"
            SELECT s.id, s.title, s.shift_date, s.start_time, s.end_time, s.min_people,
                   s.max_people, s.remarks, s.status, s.created_at, s.updated_at,
                   COUNT(r.id) FILTER (WHERE r.status = 'active') AS active_count
            FROM bar_shifts s
            LEFT JOIN registrations r ON r.shift_id = s.id
            WHERE s.id = $1
            GROUP BY s.id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List shifts on today or later with their active registration counts.
    pub async fn list_upcoming_with_counts(
        &self,
    ) -> Result<Vec<ShiftWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_upcoming_shifts");
        let result = sqlx::query_as::<_, ShiftWithCountEntity>(
            r#"
            SELECT s.id, s.title, s.shift_date, s.start_time, s.end_time, s.min_people,
                   s.max_people, s.remarks, s.status, s.created_at, s.updated_at,
                   COUNT(r.id) FILTER (WHERE r.status = 'active') AS active_count
            FROM bar_shifts s
            LEFT JOIN registrations r ON r.shift_id = s.id
            WHERE s.shift_date >= CURRENT_DATE
            GROUP BY s.id
            ORDER BY s.shift_date, s.start_time
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List every shift, past included, with active registration counts.
    pub async fn list_all_with_counts(&self) -> Result<Vec<ShiftWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_shifts");
        let result = sqlx::query_as::<_, ShiftWithCountEntity>(
            r#"
            SELECT s.id, s.title, s.shift_date, s.start_time, s.end_time, s.min_people,
                   s.max_people, s.remarks, s.status, s.created_at, s.updated_at,
                   COUNT(r.id) FILTER (WHERE r.status = 'active') AS active_count
            FROM bar_shifts s
            LEFT JOIN registrations r ON r.shift_id = s.id
            GROUP BY s.id
            ORDER BY s.shift_date, s.start_time
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Toggle the stored status between open and closed.
    ///
    /// The stored status never becomes `full` here; that value is derived
    /// from the count on read.
    pub async fn set_open_state(
        &self,
        id: Uuid,
        open: bool,
    ) -> Result<Option<ShiftEntity>, sqlx::Error> {
        let status = if open {
            ShiftStatusDb::Open
        } else {
            ShiftStatusDb::Closed
        };
        let timer = QueryTimer::new("set_shift_open_state");
        let result = sqlx::query_as::<_, ShiftEntity>(
            r#"
            UPDATE bar_shifts
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, shift_date, start_time, end_time, min_people, max_people,
                      remarks, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a shift. Registrations and their sent-log rows cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_shift");
        let result = sqlx::query("DELETE FROM bar_shifts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Count of `active` registrations for a shift, read at call time.
    pub async fn active_registration_count(&self, shift_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("active_registration_count");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM registrations
            WHERE shift_id = $1 AND status = 'active'
            "#,
        )
        .bind(shift_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a shift has reached its capacity. None if the shift is absent.
    pub async fn is_shift_full(&self, shift_id: Uuid) -> Result<Option<bool>, sqlx::Error> {
        let timer = QueryTimer::new("is_shift_full");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT (SELECT COUNT(*)
                    FROM registrations r
                    WHERE r.shift_id = s.id AND r.status = 'active') >= s.max_people
            FROM bar_shifts s
            WHERE s.id = $1
            "#,
        )
        .bind(shift_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
