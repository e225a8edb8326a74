//! Domain services for Barshift.
//!
//! Services contain business rules that operate on domain models.

pub mod admission;
pub mod mailer;

pub use admission::{admission_check, can_admit, effective_status, AdmissionRefusal};
pub use mailer::{MockReminderMailer, ReminderMailer, ReminderMessage, SendResult};
