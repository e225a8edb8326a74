//! HTTP route handlers.

pub mod admin_export;
pub mod admin_registrations;
pub mod admin_reminders;
pub mod admin_shifts;
pub mod health;
pub mod registrations;
pub mod shifts;
