//! Shift domain models for the volunteer schedule.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Status of a shift.
///
/// The engine only ever stores `open` or `closed`; `full` is derived on read
/// from the active-registration count (see [`crate::services::admission`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Open,
    Full,
    Closed,
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftStatus::Open => write!(f, "open"),
            ShiftStatus::Full => write!(f, "full"),
            ShiftStatus::Closed => write!(f, "closed"),
        }
    }
}

/// A scheduled bar shift with a capacity window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Shift {
    pub id: Uuid,
    pub title: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub min_people: i32,
    pub max_people: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub status: ShiftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    /// Status the shift presents to registrants, derived from the stored
    /// status and the current active count.
    pub fn effective_status(&self, active_count: i64) -> ShiftStatus {
        crate::services::admission::effective_status(self.status, active_count, self.max_people)
    }
}

/// A shift together with its live registration count and derived status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ShiftWithCount {
    #[serde(flatten)]
    pub shift: Shift,
    pub active_count: i64,
    pub effective_status: ShiftStatus,
}

impl ShiftWithCount {
    pub fn new(shift: Shift, active_count: i64) -> Self {
        let effective_status = shift.effective_status(active_count);
        Self {
            shift,
            active_count,
            effective_status,
        }
    }
}

/// Response wrapper for shift listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ShiftListResponse {
    pub shifts: Vec<ShiftWithCount>,
    pub total: usize,
}

/// Request to create a shift.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateShiftRequest {
    #[validate(custom(function = "shared::validation::validate_shift_title"))]
    pub title: String,

    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,

    #[validate(range(min = 1, max = 50, message = "min_people must be between 1 and 50"))]
    pub min_people: i32,

    #[validate(range(min = 1, max = 50, message = "max_people must be between 1 and 50"))]
    pub max_people: i32,

    #[validate(length(max = 255, message = "Remarks must be at most 255 characters"))]
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CreateShiftRequest {
    /// Cross-field schedule rules the field derives cannot express: the date
    /// must not lie in the past, the time window must be well-formed, and the
    /// capacity bounds must be ordered.
    pub fn schedule_checks(&self) -> Result<(), validator::ValidationError> {
        shared::validation::validate_future_date(&self.shift_date)?;
        shared::validation::validate_time_window(self.start_time, self.end_time)?;
        shared::validation::validate_people_bounds(self.min_people, self.max_people)
    }

    /// Copy with sanitized free-text fields, ready for storage.
    pub fn sanitized(&self) -> Self {
        Self {
            title: shared::validation::sanitize_text(&self.title),
            remarks: self
                .remarks
                .as_deref()
                .map(shared::validation::sanitize_text)
                .filter(|r| !r.is_empty()),
            ..self.clone()
        }
    }
}

/// Request to toggle a shift between open and closed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SetShiftOpenStateRequest {
    pub open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_request() -> CreateShiftRequest {
        CreateShiftRequest {
            title: "Zaterdag middagdienst".to_string(),
            shift_date: Utc::now().date_naive() + Duration::days(14),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            min_people: 2,
            max_people: 4,
            remarks: None,
        }
    }

    fn sample_shift(status: ShiftStatus, max_people: i32) -> Shift {
        Shift {
            id: Uuid::new_v4(),
            title: "Test shift".to_string(),
            shift_date: Utc::now().date_naive() + Duration::days(7),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            min_people: 1,
            max_people,
            remarks: None,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_shift_status_display() {
        assert_eq!(ShiftStatus::Open.to_string(), "open");
        assert_eq!(ShiftStatus::Full.to_string(), "full");
        assert_eq!(ShiftStatus::Closed.to_string(), "closed");
    }

    #[test]
    fn test_shift_status_serde() {
        assert_eq!(serde_json::to_string(&ShiftStatus::Closed).unwrap(), "\"closed\"");
        let status: ShiftStatus = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(status, ShiftStatus::Open);
    }

    #[test]
    fn test_effective_status_derives_full_from_count() {
        let shift = sample_shift(ShiftStatus::Open, 2);
        assert_eq!(shift.effective_status(0), ShiftStatus::Open);
        assert_eq!(shift.effective_status(1), ShiftStatus::Open);
        assert_eq!(shift.effective_status(2), ShiftStatus::Full);
        assert_eq!(shift.effective_status(3), ShiftStatus::Full);
    }

    #[test]
    fn test_effective_status_closed_overrides_full() {
        let shift = sample_shift(ShiftStatus::Closed, 2);
        assert_eq!(shift.effective_status(5), ShiftStatus::Closed);
        assert_eq!(shift.effective_status(0), ShiftStatus::Closed);
    }

    #[test]
    fn test_shift_with_count_carries_derived_status() {
        let shift = sample_shift(ShiftStatus::Open, 3);
        let with_count = ShiftWithCount::new(shift, 3);
        assert_eq!(with_count.active_count, 3);
        assert_eq!(with_count.effective_status, ShiftStatus::Full);
    }

    #[test]
    fn test_create_shift_request_deserialize() {
        let json = r#"{
            "title": "Vrijdagavond",
            "shift_date": "2030-05-17",
            "start_time": "19:00:00",
            "end_time": "23:30:00",
            "min_people": 1,
            "max_people": 3
        }"#;
        let req: CreateShiftRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.title, "Vrijdagavond");
        assert_eq!(req.max_people, 3);
        assert!(req.remarks.is_none());
    }

    #[test]
    fn test_create_shift_request_validates_title() {
        let mut req = sample_request();
        assert!(req.validate().is_ok());

        req.title = "ab".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_schedule_checks_rejects_past_date() {
        let mut req = sample_request();
        req.shift_date = Utc::now().date_naive() - Duration::days(1);
        let err = req.schedule_checks().unwrap_err();
        assert_eq!(err.code, "date_past");
    }

    #[test]
    fn test_schedule_checks_rejects_inverted_window() {
        let mut req = sample_request();
        req.start_time = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        req.end_time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let err = req.schedule_checks().unwrap_err();
        assert_eq!(err.code, "time_window");
    }

    #[test]
    fn test_schedule_checks_rejects_unordered_capacity() {
        let mut req = sample_request();
        req.min_people = 5;
        req.max_people = 4;
        let err = req.schedule_checks().unwrap_err();
        assert_eq!(err.code, "people_bounds");
    }

    #[test]
    fn test_sanitized_strips_dangerous_text() {
        let mut req = sample_request();
        req.title = "  <b>Bardienst</b>  ".to_string();
        req.remarks = Some("Sleutel bij 'Jan' & Piet".to_string());

        let clean = req.sanitized();
        assert_eq!(clean.title, "bBardienst/b");
        assert_eq!(clean.remarks.as_deref(), Some("Sleutel bij Jan  Piet"));
    }

    #[test]
    fn test_sanitized_drops_empty_remarks() {
        let mut req = sample_request();
        req.remarks = Some("   ".to_string());
        assert!(req.sanitized().remarks.is_none());
    }

    #[test]
    fn test_set_open_state_deserialize() {
        let req: SetShiftOpenStateRequest = serde_json::from_str(r#"{"open":false}"#).unwrap();
        assert!(!req.open);
    }
}
