//! Shift entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Shift, ShiftStatus, ShiftWithCount};

/// Database enum for shift status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "shift_status", rename_all = "lowercase")]
pub enum ShiftStatusDb {
    Open,
    Full,
    Closed,
}

impl From<ShiftStatusDb> for ShiftStatus {
    fn from(status: ShiftStatusDb) -> Self {
        match status {
            ShiftStatusDb::Open => ShiftStatus::Open,
            ShiftStatusDb::Full => ShiftStatus::Full,
            ShiftStatusDb::Closed => ShiftStatus::Closed,
        }
    }
}

impl From<ShiftStatus> for ShiftStatusDb {
    fn from(status: ShiftStatus) -> Self {
        match status {
            ShiftStatus::Open => ShiftStatusDb::Open,
            ShiftStatus::Full => ShiftStatusDb::Full,
            ShiftStatus::Closed => ShiftStatusDb::Closed,
        }
    }
}

/// Database row mapping for the bar_shifts table.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftEntity {
    pub id: Uuid,
    pub title: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub min_people: i32,
    pub max_people: i32,
    pub remarks: Option<String>,
    pub status: ShiftStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShiftEntity> for Shift {
    fn from(e: ShiftEntity) -> Self {
        Shift {
            id: e.id,
            title: e.title,
            shift_date: e.shift_date,
            start_time: e.start_time,
            end_time: e.end_time,
            min_people: e.min_people,
            max_people: e.max_people,
            remarks: e.remarks,
            status: e.status.into(),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Shift row extended with its active registration count.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftWithCountEntity {
    pub id: Uuid,
    pub title: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub min_people: i32,
    pub max_people: i32,
    pub remarks: Option<String>,
    pub status: ShiftStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active_count: i64,
}

impl From<ShiftWithCountEntity> for ShiftWithCount {
    fn from(e: ShiftWithCountEntity) -> Self {
        let shift = Shift {
            id: e.id,
            title: e.title,
            shift_date: e.shift_date,
            start_time: e.start_time,
            end_time: e.end_time,
            min_people: e.min_people,
            max_people: e.max_people,
            remarks: e.remarks,
            status: e.status.into(),
            created_at: e.created_at,
            updated_at: e.updated_at,
        };
        ShiftWithCount::new(shift, e.active_count)
    }
}

/// Minimal shift row locked during admission.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftCapacityEntity {
    pub id: Uuid,
    pub status: ShiftStatusDb,
    pub max_people: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_status_db_round_trip() {
        for status in [ShiftStatus::Open, ShiftStatus::Full, ShiftStatus::Closed] {
            let db: ShiftStatusDb = status.into();
            let back: ShiftStatus = db.into();
            assert_eq!(back, status);
        }
    }
}
