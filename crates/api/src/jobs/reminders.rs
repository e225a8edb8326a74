//! Background job that sends due shift reminders.

use domain::models::ReminderKind;

use super::scheduler::{Job, JobFrequency};
use crate::services::ReminderService;

/// Dispatches both reminder milestones on a configurable interval.
///
/// Dispatch is idempotent through the sent-log, so running more often than
/// once per day only re-reads the due list; nobody is mailed twice.
pub struct ReminderDispatchJob {
    service: ReminderService,
    interval_minutes: u64,
}

impl ReminderDispatchJob {
    pub fn new(service: ReminderService, interval_minutes: u64) -> Self {
        Self {
            service,
            interval_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Job for ReminderDispatchJob {
    fn name(&self) -> &'static str {
        "reminder_dispatch"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    async fn execute(&self) -> Result<(), String> {
        for kind in [ReminderKind::OneWeek, ReminderKind::ThreeDays] {
            let report = self.service.dispatch(kind).await.map_err(|e| {
                format!(
                    "reminder dispatch for {} day lead failed: {}",
                    kind.lead_days(),
                    e
                )
            })?;

            if report.failed > 0 {
                tracing::warn!(
                    lead_days = report.lead_days,
                    failed = report.failed,
                    total = report.total,
                    "Some reminders were not delivered; they stay due for the next run"
                );
            }
        }
        Ok(())
    }
}
