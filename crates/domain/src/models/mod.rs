//! Domain models for Barshift.

pub mod admin;
pub mod registration;
pub mod reminder;
pub mod shift;

pub use admin::AdminUser;
pub use registration::{
    BulkUnsubscribeResponse, CreateRegistrationRequest, Registration, RegistrationExportResponse,
    RegistrationExportRow, RegistrationListResponse, RegistrationStatus, RegistrationWithShift,
    UnsubscribeRequest,
};
pub use reminder::{
    DispatchDetail, DispatchOutcome, DispatchRemindersRequest, DispatchReport,
    DueRemindersResponse, ReminderCandidate, ReminderKind,
};
pub use shift::{
    CreateShiftRequest, SetShiftOpenStateRequest, Shift, ShiftListResponse, ShiftStatus,
    ShiftWithCount,
};
