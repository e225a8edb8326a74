//! Reminder scheduling models: milestones, due candidates, dispatch reports.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reminder milestone, keyed by how many days before the shift it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    OneWeek,
    ThreeDays,
}

impl ReminderKind {
    pub fn lead_days(&self) -> i64 {
        match self {
            ReminderKind::OneWeek => 7,
            ReminderKind::ThreeDays => 3,
        }
    }

    /// Milestone for a lead time; only 7 and 3 days are supported.
    pub fn from_lead_days(lead_days: i64) -> Option<Self> {
        match lead_days {
            7 => Some(ReminderKind::OneWeek),
            3 => Some(ReminderKind::ThreeDays),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderKind::OneWeek => write!(f, "one_week"),
            ReminderKind::ThreeDays => write!(f, "three_days"),
        }
    }
}

/// An active registration that is due a reminder for its shift.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReminderCandidate {
    pub registration_id: Uuid,
    pub shift_id: Uuid,
    pub name: String,
    pub email: String,
    pub shift_title: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Per-candidate outcome of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Delivered and recorded in the sent-log.
    Sent,
    /// Another run recorded this reminder first; nothing was sent.
    AlreadyRecorded,
    /// Delivered, but the sent-log write failed. The next run may send a
    /// duplicate; that risk is accepted and surfaced rather than hidden.
    SentLogFailed,
    /// Delivery failed; the candidate stays due for the next run.
    Failed,
}

impl DispatchOutcome {
    /// Whether the recipient actually received a message.
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Sent | DispatchOutcome::SentLogFailed)
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Sent => write!(f, "sent"),
            DispatchOutcome::AlreadyRecorded => write!(f, "already_recorded"),
            DispatchOutcome::SentLogFailed => write!(f, "sent_log_failed"),
            DispatchOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// One line of a dispatch report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DispatchDetail {
    pub registration_id: Uuid,
    pub email: String,
    pub outcome: DispatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of one reminder batch.
///
/// `successful` counts delivered messages; `failed` counts candidates whose
/// delivery did not happen (`failed`) or was skipped as already handled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DispatchReport {
    pub lead_days: i64,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub details: Vec<DispatchDetail>,
}

impl DispatchReport {
    pub fn new(lead_days: i64) -> Self {
        Self {
            lead_days,
            total: 0,
            successful: 0,
            failed: 0,
            details: Vec::new(),
        }
    }

    pub fn record(&mut self, detail: DispatchDetail) {
        self.total += 1;
        if detail.outcome.is_delivered() {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.details.push(detail);
    }
}

/// Response for the due-reminder preview endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DueRemindersResponse {
    pub lead_days: i64,
    pub candidates: Vec<ReminderCandidate>,
    pub total: usize,
}

/// Request to dispatch one reminder batch on demand.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DispatchRemindersRequest {
    pub lead_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_kind_lead_days() {
        assert_eq!(ReminderKind::OneWeek.lead_days(), 7);
        assert_eq!(ReminderKind::ThreeDays.lead_days(), 3);
    }

    #[test]
    fn test_reminder_kind_from_lead_days() {
        assert_eq!(ReminderKind::from_lead_days(7), Some(ReminderKind::OneWeek));
        assert_eq!(ReminderKind::from_lead_days(3), Some(ReminderKind::ThreeDays));
        assert_eq!(ReminderKind::from_lead_days(5), None);
        assert_eq!(ReminderKind::from_lead_days(0), None);
    }

    #[test]
    fn test_reminder_kind_display_matches_serde() {
        assert_eq!(ReminderKind::OneWeek.to_string(), "one_week");
        assert_eq!(
            serde_json::to_string(&ReminderKind::OneWeek).unwrap(),
            "\"one_week\""
        );
        assert_eq!(ReminderKind::ThreeDays.to_string(), "three_days");
    }

    #[test]
    fn test_dispatch_outcome_delivered() {
        assert!(DispatchOutcome::Sent.is_delivered());
        assert!(DispatchOutcome::SentLogFailed.is_delivered());
        assert!(!DispatchOutcome::AlreadyRecorded.is_delivered());
        assert!(!DispatchOutcome::Failed.is_delivered());
    }

    #[test]
    fn test_dispatch_report_counts() {
        let mut report = DispatchReport::new(7);
        let id = Uuid::new_v4();
        report.record(DispatchDetail {
            registration_id: id,
            email: "a@example.com".to_string(),
            outcome: DispatchOutcome::Sent,
            error: None,
        });
        report.record(DispatchDetail {
            registration_id: id,
            email: "b@example.com".to_string(),
            outcome: DispatchOutcome::Failed,
            error: Some("smtp timeout".to_string()),
        });
        report.record(DispatchDetail {
            registration_id: id,
            email: "c@example.com".to_string(),
            outcome: DispatchOutcome::SentLogFailed,
            error: Some("insert failed".to_string()),
        });

        assert_eq!(report.total, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_dispatch_detail_serializes_without_null_error() {
        let detail = DispatchDetail {
            registration_id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            outcome: DispatchOutcome::Sent,
            error: None,
        };
        let json = serde_json::to_string(&detail).unwrap();
        assert!(!json.contains("error"));
        assert!(json.contains("\"sent\""));
    }
}
