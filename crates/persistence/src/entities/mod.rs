//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod admin_user;
pub mod email_notification;
pub mod registration;
pub mod shift;

pub use admin_user::AdminUserEntity;
pub use email_notification::{
    EmailNotificationEntity, NotificationTypeDb, ReminderCandidateEntity,
};
pub use registration::{
    RegistrationEntity, RegistrationExportEntity, RegistrationStatusDb,
    RegistrationWithShiftEntity,
};
pub use shift::{ShiftCapacityEntity, ShiftEntity, ShiftStatusDb, ShiftWithCountEntity};
