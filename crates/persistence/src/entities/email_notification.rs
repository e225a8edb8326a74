//! Email notification entity (sent-log row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{ReminderCandidate, ReminderKind};

/// Database enum for reminder notification type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
pub enum NotificationTypeDb {
    OneWeek,
    ThreeDays,
}

impl From<NotificationTypeDb> for ReminderKind {
    fn from(kind: NotificationTypeDb) -> Self {
        match kind {
            NotificationTypeDb::OneWeek => ReminderKind::OneWeek,
            NotificationTypeDb::ThreeDays => ReminderKind::ThreeDays,
        }
    }
}

impl From<ReminderKind> for NotificationTypeDb {
    fn from(kind: ReminderKind) -> Self {
        match kind {
            ReminderKind::OneWeek => NotificationTypeDb::OneWeek,
            ReminderKind::ThreeDays => NotificationTypeDb::ThreeDays,
        }
    }
}

/// Database row mapping for the email_notifications table.
///
/// Rows are written exactly once per (registration, milestone) after a
/// confirmed dispatch and never updated.
#[derive(Debug, Clone, FromRow)]
pub struct EmailNotificationEntity {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub notification_type: NotificationTypeDb,
    pub sent_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Active registration due a reminder, joined with its shift.
#[derive(Debug, Clone, FromRow)]
pub struct ReminderCandidateEntity {
    pub registration_id: Uuid,
    pub shift_id: Uuid,
    pub name: String,
    pub email: String,
    pub shift_title: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<ReminderCandidateEntity> for ReminderCandidate {
    fn from(e: ReminderCandidateEntity) -> Self {
        ReminderCandidate {
            registration_id: e.registration_id,
            shift_id: e.shift_id,
            name: e.name,
            email: e.email,
            shift_title: e.shift_title,
            shift_date: e.shift_date,
            start_time: e.start_time,
            end_time: e.end_time,
        }
    }
}
