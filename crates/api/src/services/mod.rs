//! Service layer: email delivery and reminder orchestration.

pub mod email;
pub mod reminder;

#[allow(unused_imports)] // Re-exports for downstream use
pub use email::{EmailError, EmailService};
pub use reminder::ReminderService;
