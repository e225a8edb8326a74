//! Capacity and admission rules.
//!
//! A shift presents one of three statuses to registrants. Only `open` and
//! `closed` are ever stored; `full` is derived from the live count of
//! `active` registrations against `max_people`. An admin-set `closed` always
//! wins over a derived `full`. These rules gate admission; the stored status
//! alone never does.

use crate::models::ShiftStatus;

/// Why an admission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionRefusal {
    #[error("shift is closed for registration")]
    Closed,
    #[error("shift has reached its maximum capacity")]
    Full,
}

/// Status a shift presents given its stored status and active count.
///
/// A stored `full` is legacy data and is treated as "not closed": the
/// outcome is still derived from the count.
pub fn effective_status(stored: ShiftStatus, active_count: i64, max_people: i32) -> ShiftStatus {
    if stored == ShiftStatus::Closed {
        return ShiftStatus::Closed;
    }
    if active_count >= i64::from(max_people) {
        return ShiftStatus::Full;
    }
    ShiftStatus::Open
}

/// Decide whether one more registration may be admitted.
pub fn admission_check(
    stored: ShiftStatus,
    active_count: i64,
    max_people: i32,
) -> Result<(), AdmissionRefusal> {
    match effective_status(stored, active_count, max_people) {
        ShiftStatus::Closed => Err(AdmissionRefusal::Closed),
        ShiftStatus::Full => Err(AdmissionRefusal::Full),
        ShiftStatus::Open => Ok(()),
    }
}

pub fn can_admit(stored: ShiftStatus, active_count: i64, max_people: i32) -> bool {
    admission_check(stored, active_count, max_people).is_ok()
}
