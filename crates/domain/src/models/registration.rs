//! Registration domain models and request DTOs.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a registration.
///
/// Removal is a two-step workflow: registrants may only request removal
/// (`pending_removal`); an admin approval deletes the row, a rejection
/// restores `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Active,
    PendingRemoval,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Active => write!(f, "active"),
            RegistrationStatus::PendingRemoval => write!(f, "pending_removal"),
        }
    }
}

/// A volunteer's registration for one shift.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Registration {
    pub id: Uuid,
    pub shift_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration joined with the shift it belongs to, for listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationWithShift {
    pub id: Uuid,
    pub shift_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub shift_title: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// One row of the registration export, sorted by shift date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationExportRow {
    pub shift_date: NaiveDate,
    pub shift_title: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub registered_at: DateTime<Utc>,
}

/// Request to register for a shift.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRegistrationRequest {
    #[validate(custom(function = "shared::validation::validate_person_name"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_email"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,
}

impl CreateRegistrationRequest {
    /// Copy with sanitized name, normalized email, and trimmed phone.
    /// Applied before validation so stored values match what was checked.
    pub fn sanitized(&self) -> Self {
        Self {
            name: shared::validation::sanitize_text(&self.name),
            email: shared::validation::normalize_email(&self.email),
            phone: self.phone.trim().to_string(),
        }
    }
}

/// Request to move one or more own registrations to `pending_removal`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UnsubscribeRequest {
    #[validate(custom(function = "shared::validation::validate_email"))]
    pub email: String,
}

impl UnsubscribeRequest {
    pub fn normalized_email(&self) -> String {
        shared::validation::normalize_email(&self.email)
    }
}

/// Response for the bulk unsubscribe operation.
#[derive(Debug, Clone, Serialize)]
pub struct BulkUnsubscribeResponse {
    pub updated: u64,
}

/// Response wrapper for registration listings.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationListResponse {
    pub registrations: Vec<RegistrationWithShift>,
    pub total: usize,
}

/// Response wrapper for the registration export.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationExportResponse {
    pub rows: Vec<RegistrationExportRow>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_status_display() {
        assert_eq!(RegistrationStatus::Active.to_string(), "active");
        assert_eq!(
            RegistrationStatus::PendingRemoval.to_string(),
            "pending_removal"
        );
    }

    #[test]
    fn test_registration_status_serde() {
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::PendingRemoval).unwrap(),
            "\"pending_removal\""
        );
        let status: RegistrationStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, RegistrationStatus::Active);
    }

    #[test]
    fn test_create_registration_request_validates() {
        let req = CreateRegistrationRequest {
            name: "Jan de Vries".to_string(),
            email: "jan@example.com".to_string(),
            phone: "+31612345678".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_registration_request_rejects_bad_phone() {
        let req = CreateRegistrationRequest {
            name: "Jan de Vries".to_string(),
            email: "jan@example.com".to_string(),
            phone: "12345".to_string(),
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_sanitized_normalizes_fields() {
        let req = CreateRegistrationRequest {
            name: "  Jan <script>".to_string(),
            email: "  Jan@Example.COM ".to_string(),
            phone: " 06 1234 5678 ".to_string(),
        };
        let clean = req.sanitized();
        assert_eq!(clean.name, "Jan script");
        assert_eq!(clean.email, "jan@example.com");
        assert_eq!(clean.phone, "06 1234 5678");
    }

    #[test]
    fn test_unsubscribe_request_normalized_email() {
        let req = UnsubscribeRequest {
            email: " Piet@Club.NL ".to_string(),
        };
        assert_eq!(req.normalized_email(), "piet@club.nl");
    }
}
