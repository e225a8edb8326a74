//! Registration entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{
    Registration, RegistrationExportRow, RegistrationStatus, RegistrationWithShift,
};

/// Database enum for registration status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "snake_case")]
pub enum RegistrationStatusDb {
    Active,
    PendingRemoval,
}

impl From<RegistrationStatusDb> for RegistrationStatus {
    fn from(status: RegistrationStatusDb) -> Self {
        match status {
            RegistrationStatusDb::Active => RegistrationStatus::Active,
            RegistrationStatusDb::PendingRemoval => RegistrationStatus::PendingRemoval,
        }
    }
}

impl From<RegistrationStatus> for RegistrationStatusDb {
    fn from(status: RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::Active => RegistrationStatusDb::Active,
            RegistrationStatus::PendingRemoval => RegistrationStatusDb::PendingRemoval,
        }
    }
}

/// Database row mapping for the registrations table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
    pub id: Uuid,
    pub shift_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: RegistrationStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RegistrationEntity> for Registration {
    fn from(e: RegistrationEntity) -> Self {
        Registration {
            id: e.id,
            shift_id: e.shift_id,
            name: e.name,
            email: e.email,
            phone: e.phone,
            status: e.status.into(),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Registration row joined with its shift for listings.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationWithShiftEntity {
    pub id: Uuid,
    pub shift_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: RegistrationStatusDb,
    pub created_at: DateTime<Utc>,
    pub shift_title: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<RegistrationWithShiftEntity> for RegistrationWithShift {
    fn from(e: RegistrationWithShiftEntity) -> Self {
        RegistrationWithShift {
            id: e.id,
            shift_id: e.shift_id,
            name: e.name,
            email: e.email,
            phone: e.phone,
            status: e.status.into(),
            created_at: e.created_at,
            shift_title: e.shift_title,
            shift_date: e.shift_date,
            start_time: e.start_time,
            end_time: e.end_time,
        }
    }
}

/// One export row: active registration with shift schedule details.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationExportEntity {
    pub shift_date: NaiveDate,
    pub shift_title: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub registered_at: DateTime<Utc>,
}

impl From<RegistrationExportEntity> for RegistrationExportRow {
    fn from(e: RegistrationExportEntity) -> Self {
        RegistrationExportRow {
            shift_date: e.shift_date,
            shift_title: e.shift_title,
            start_time: e.start_time,
            end_time: e.end_time,
            name: e.name,
            email: e.email,
            phone: e.phone,
            registered_at: e.registered_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_status_db_round_trip() {
        for status in [RegistrationStatus::Active, RegistrationStatus::PendingRemoval] {
            let db: RegistrationStatusDb = status.into();
            let back: RegistrationStatus = db.into();
            assert_eq!(back, status);
        }
    }
}
