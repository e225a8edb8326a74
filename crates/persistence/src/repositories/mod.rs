//! Repository implementations for database operations.

pub mod admin_user;
pub mod email_notification;
pub mod registration;
pub mod shift;

pub use admin_user::AdminUserRepository;
pub use email_notification::EmailNotificationRepository;
pub use registration::{AdmissionError, RegistrationRepository};
pub use shift::ShiftRepository;
