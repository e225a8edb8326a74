//! Email notification repository for the reminder sent-log.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{NotificationTypeDb, ReminderCandidateEntity};
use crate::metrics::QueryTimer;

/// Repository for the reminder sent-log.
#[derive(Clone)]
pub struct EmailNotificationRepository {
    pool: PgPool,
}

impl EmailNotificationRepository {
    /// Creates a new EmailNotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Active registrations for shifts on the target date with no sent-log
    /// row for this milestone. Read-only.
    pub async fn find_due_on(
        &self,
        target_date: NaiveDate,
        kind: NotificationTypeDb,
    ) -> Result<Vec<ReminderCandidateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_due_reminders");
        let result = sqlx::query_as::<_, ReminderCandidateEntity>(
            r#"
            SELECT r.id AS registration_id, r.shift_id, r.name, r.email,
                   s.title AS shift_title, s.shift_date, s.start_time, s.end_time
            FROM registrations r
            JOIN bar_shifts s ON s.id = r.shift_id
            WHERE r.status = 'active'
              AND s.shift_date = $1
              AND NOT EXISTS (
                  SELECT 1 FROM email_notifications n
                  WHERE n.registration_id = r.id AND n.notification_type = $2
              )
            ORDER BY s.start_time, r.created_at
            "#,
        )
        .bind(target_date)
        .bind(kind)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record that a reminder was sent.
    ///
    /// Returns false when a row for this (registration, milestone) already
    /// exists; a concurrent duplicate insert resolves here as a no-op.
    pub async fn record_sent(
        &self,
        registration_id: Uuid,
        kind: NotificationTypeDb,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("record_reminder_sent");
        let result = sqlx::query(
            r#"
            INSERT INTO email_notifications (registration_id, notification_type)
            VALUES ($1, $2)
            ON CONFLICT (registration_id, notification_type) DO NOTHING
            "#,
        )
        .bind(registration_id)
        .bind(kind)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Whether a reminder was already recorded for this milestone.
    pub async fn was_sent(
        &self,
        registration_id: Uuid,
        kind: NotificationTypeDb,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("reminder_was_sent");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM email_notifications
                WHERE registration_id = $1 AND notification_type = $2
            )
            "#,
        )
        .bind(registration_id)
        .bind(kind)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
