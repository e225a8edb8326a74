//! Registration repository, including the atomic admission operation.

use sqlx::PgPool;
use uuid::Uuid;

use domain::services::admission::{self, AdmissionRefusal};

use crate::entities::{
    RegistrationEntity, RegistrationExportEntity, RegistrationStatusDb,
    RegistrationWithShiftEntity, ShiftCapacityEntity,
};
use crate::metrics::QueryTimer;

/// Why an admission attempt produced no registration.
///
/// Everything except `Database` is an expected outcome of the capacity
/// rules and maps to a conflict, not a fault.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("Shift not found")]
    ShiftNotFound,
    #[error("shift is closed for registration")]
    ShiftClosed,
    #[error("shift has reached its maximum capacity")]
    ShiftFull,
    #[error("an active registration for this email already exists")]
    DuplicateRegistration,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository for registration-related database operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Admit a registration: capacity re-check, duplicate re-check, and
    /// insert in one transaction.
    ///
    /// The shift row is locked with `SELECT ... FOR UPDATE` so concurrent
    /// admissions for the same shift serialize; the count is read fresh
    /// under that lock. Expects a normalized (lower-case, trimmed) email.
    pub async fn admit(
        &self,
        shift_id: Uuid,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<RegistrationEntity, AdmissionError> {
        let timer = QueryTimer::new("admit_registration");
        let result = self.admit_in_tx(shift_id, name, email, phone).await;
        timer.record();
        result
    }

    async fn admit_in_tx(
        &self,
        shift_id: Uuid,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<RegistrationEntity, AdmissionError> {
        let mut tx = self.pool.begin().await?;

        let shift = sqlx::query_as::<_, ShiftCapacityEntity>(
            r#"
            SELECT id, status, max_people
            FROM bar_shifts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(shift_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AdmissionError::ShiftNotFound)?;

        let active_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE shift_id = $1 AND status = 'active'",
        )
        .bind(shift_id)
        .fetch_one(&mut *tx)
        .await?;

        admission::admission_check(shift.status.into(), active_count, shift.max_people).map_err(
            |refusal| match refusal {
                AdmissionRefusal::Closed => AdmissionError::ShiftClosed,
                AdmissionRefusal::Full => AdmissionError::ShiftFull,
            },
        )?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM registrations
                WHERE shift_id = $1 AND email = $2 AND status = 'active'
            )
            "#,
        )
        .bind(shift_id)
        .bind(email)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            return Err(AdmissionError::DuplicateRegistration);
        }

        // The partial unique index on (shift_id, email) WHERE active backs
        // up the probe above.
        let inserted = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            INSERT INTO registrations (shift_id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, shift_id, name, email, phone, status, created_at, updated_at
            "#,
        )
        .bind(shift_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .fetch_one(&mut *tx)
        .await;

        let entity = match inserted {
            Ok(entity) => entity,
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AdmissionError::DuplicateRegistration)
            }
            Err(err) => return Err(AdmissionError::Database(err)),
        };

        tx.commit().await?;

        tracing::debug!(
            shift_id = %shift_id,
            registration_id = %entity.id,
            active_count = active_count + 1,
            "Admitted registration"
        );

        Ok(entity)
    }

    /// Find a registration by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_registration_by_id");
        let result = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT id, shift_id, name, email, phone, status, created_at, updated_at
            FROM registrations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a registrant's registrations for upcoming shifts, both statuses.
    pub async fn list_by_email_upcoming(
        &self,
        email: &str,
    ) -> Result<Vec<RegistrationWithShiftEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_registrations_by_email");
        let result = sqlx::query_as::<_, RegistrationWithShiftEntity>(
            r#"
            SELECT r.id, r.shift_id, r.name, r.email, r.phone, r.status, r.created_at,
                   s.title AS shift_title, s.shift_date, s.start_time, s.end_time
            FROM registrations r
            JOIN bar_shifts s ON s.id = r.shift_id
            WHERE r.email = $1 AND s.shift_date >= CURRENT_DATE
            ORDER BY s.shift_date, s.start_time
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List registrations with shift details, newest first, with optional
    /// status and shift filters.
    pub async fn list_filtered(
        &self,
        status: Option<RegistrationStatusDb>,
        shift_id: Option<Uuid>,
    ) -> Result<Vec<RegistrationWithShiftEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_registrations_filtered");
        let result = sqlx::query_as::<_, RegistrationWithShiftEntity>(
            r#"
            SELECT r.id, r.shift_id, r.name, r.email, r.phone, r.status, r.created_at,
                   s.title AS shift_title, s.shift_date, s.start_time, s.end_time
            FROM registrations r
            JOIN bar_shifts s ON s.id = r.shift_id
            WHERE ($1 IS NULL OR r.status = $1)
              AND ($2 IS NULL OR r.shift_id = $2)
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(status)
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Move one registration from `active` to `pending_removal`.
    ///
    /// Conditional update; None means the precondition did not hold.
    pub async fn request_removal(
        &self,
        id: Uuid,
    ) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("request_registration_removal");
        let result = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            UPDATE registrations
            SET status = 'pending_removal', updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            RETURNING id, shift_id, name, email, phone, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Move every `active` registration of an email for upcoming shifts to
    /// `pending_removal`. Past-dated shifts are left untouched.
    pub async fn request_removal_bulk(&self, email: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("request_registration_removal_bulk");
        let result = sqlx::query(
            r#"
            UPDATE registrations r
            SET status = 'pending_removal', updated_at = NOW()
            FROM bar_shifts s
            WHERE s.id = r.shift_id
              AND r.email = $1
              AND r.status = 'active'
              AND s.shift_date >= CURRENT_DATE
            "#,
        )
        .bind(email)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected());
        timer.record();
        result
    }

    /// Approve a pending removal: delete the row, freeing capacity.
    ///
    /// Conditional delete; false means the registration was not in
    /// `pending_removal`.
    pub async fn approve_removal(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("approve_registration_removal");
        let result = sqlx::query(
            "DELETE FROM registrations WHERE id = $1 AND status = 'pending_removal'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Reject a pending removal: restore `active` without a capacity change.
    pub async fn reject_removal(
        &self,
        id: Uuid,
    ) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("reject_registration_removal");
        let result = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            UPDATE registrations
            SET status = 'active', updated_at = NOW()
            WHERE id = $1 AND status = 'pending_removal'
            RETURNING id, shift_id, name, email, phone, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Admin override: delete a registration regardless of its status.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_registration");
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Export every `active` registration with shift schedule details,
    /// sorted by shift date.
    pub async fn export_active(&self) -> Result<Vec<RegistrationExportEntity>, sqlx::Error> {
        let timer = QueryTimer::new("export_active_registrations");
        let result = sqlx::query_as::<_, RegistrationExportEntity>(
            r#"
            SELECT s.shift_date, s.title AS shift_title, s.start_time, s.end_time,
                   r.name, r.email, r.phone, r.created_at AS registered_at
            FROM registrations r
            JOIN bar_shifts s ON s.id = r.shift_id
            WHERE r.status = 'active'
            ORDER BY s.shift_date, s.start_time, r.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_error_messages() {
        assert_eq!(
            AdmissionError::ShiftClosed.to_string(),
            "shift is closed for registration"
        );
        assert_eq!(
            AdmissionError::ShiftFull.to_string(),
            "shift has reached its maximum capacity"
        );
        assert_eq!(
            AdmissionError::DuplicateRegistration.to_string(),
            "an active registration for this email already exists"
        );
    }
}
