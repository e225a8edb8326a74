//! Reminder dispatch service.
//!
//! Finds registrations whose shift is exactly the lead time away, renders the
//! reminder email, delivers it through the mailer seam, and records the
//! delivery in the sent-log. The sent-log is the sole source of truth for
//! "already handled", so running dispatch twice never emails anyone twice
//! short of the documented log-write race.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, info, warn};

use domain::models::{DispatchDetail, DispatchOutcome, DispatchReport, ReminderCandidate, ReminderKind};
use domain::services::{ReminderMailer, ReminderMessage, SendResult};
use persistence::repositories::EmailNotificationRepository;

use crate::config::EmailConfig;
use crate::middleware::metrics::record_reminders_sent;

/// Orchestrates reminder batches for one lead time at a time.
#[derive(Clone)]
pub struct ReminderService {
    notifications: EmailNotificationRepository,
    mailer: Arc<dyn ReminderMailer>,
    email: Arc<EmailConfig>,
}

impl ReminderService {
    pub fn new(pool: PgPool, mailer: Arc<dyn ReminderMailer>, email: EmailConfig) -> Self {
        Self {
            notifications: EmailNotificationRepository::new(pool),
            mailer,
            email: Arc::new(email),
        }
    }

    /// Read-only view of the candidates a dispatch run would process.
    pub async fn preview(&self, kind: ReminderKind) -> Result<Vec<ReminderCandidate>, sqlx::Error> {
        let target_date = Utc::now().date_naive() + Duration::days(kind.lead_days());
        let candidates = self
            .notifications
            .find_due_on(target_date, kind.into())
            .await?;
        Ok(candidates.into_iter().map(Into::into).collect())
    }

    /// Run one dispatch batch for the given lead time.
    ///
    /// Candidates are processed independently; one failed delivery never stops
    /// the rest of the batch.
    pub async fn dispatch(&self, kind: ReminderKind) -> Result<DispatchReport, sqlx::Error> {
        let candidates = self.preview(kind).await?;
        let mut report = DispatchReport::new(kind.lead_days());

        info!(
            lead_days = kind.lead_days(),
            candidates = candidates.len(),
            "Starting reminder dispatch"
        );

        for candidate in &candidates {
            let detail = self.dispatch_one(candidate, kind).await;
            report.record(detail);
        }

        if report.successful > 0 {
            record_reminders_sent(kind.lead_days(), report.successful);
        }

        info!(
            lead_days = report.lead_days,
            total = report.total,
            successful = report.successful,
            failed = report.failed,
            "Reminder dispatch completed"
        );

        Ok(report)
    }

    async fn dispatch_one(&self, candidate: &ReminderCandidate, kind: ReminderKind) -> DispatchDetail {
        let message = self.render(candidate, kind);

        let (outcome, error) = match self.mailer.send(message).await {
            // A disabled sink still consumes the candidate so the batch does
            // not re-list it forever; the sink logs the skip.
            SendResult::Sent | SendResult::Disabled => {
                match self
                    .notifications
                    .record_sent(candidate.registration_id, kind.into())
                    .await
                {
                    Ok(true) => {
                        debug!(
                            registration_id = %candidate.registration_id,
                            email = %candidate.email,
                            "Reminder sent and recorded"
                        );
                        (DispatchOutcome::Sent, None)
                    }
                    Ok(false) => {
                        info!(
                            registration_id = %candidate.registration_id,
                            "Reminder already recorded by a concurrent run"
                        );
                        (DispatchOutcome::AlreadyRecorded, None)
                    }
                    Err(e) => {
                        warn!(
                            registration_id = %candidate.registration_id,
                            error = %e,
                            "Reminder delivered but sent-log write failed; a later run may send a duplicate"
                        );
                        (DispatchOutcome::SentLogFailed, Some(e.to_string()))
                    }
                }
            }
            SendResult::Failed(e) => {
                warn!(
                    registration_id = %candidate.registration_id,
                    email = %candidate.email,
                    error = %e,
                    "Reminder delivery failed; candidate stays due"
                );
                (DispatchOutcome::Failed, Some(e))
            }
        };

        DispatchDetail {
            registration_id: candidate.registration_id,
            email: candidate.email.clone(),
            outcome,
            error,
        }
    }

    /// Render the reminder email for one candidate.
    pub fn render(&self, candidate: &ReminderCandidate, kind: ReminderKind) -> ReminderMessage {
        let subject = match kind {
            ReminderKind::OneWeek => {
                format!("Reminder: bar shift next week - {}", candidate.shift_title)
            }
            ReminderKind::ThreeDays => {
                format!("Reminder: bar shift in 3 days - {}", candidate.shift_title)
            }
        };

        let date = candidate.shift_date.format("%A %-d %B %Y").to_string();
        let start = candidate.start_time.format("%H:%M").to_string();
        let end = candidate.end_time.format("%H:%M").to_string();

        let text_body = format!(
            r#"Hi {name},

This is a reminder that you are signed up for the following bar shift:

{title}
Date: {date}
Time: {start} - {end}

See you at the agreed time!

Kind regards,
{club}"#,
            name = candidate.name,
            title = candidate.shift_title,
            date = date,
            start = start,
            end = end,
            club = self.email.club_name,
        );

        let html_body = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #0c6be0;">Bar Shift Reminder</h2>
  <p>Hi {name},</p>
  <p>This is a reminder that you are signed up for the following bar shift:</p>
  <div style="background-color: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="margin: 0 0 10px 0; color: #333;">{title}</h3>
    <p style="margin: 5px 0;"><strong>Date:</strong> {date}</p>
    <p style="margin: 5px 0;"><strong>Time:</strong> {start} - {end}</p>
  </div>
  <p>See you at the agreed time!</p>
  <p style="margin-top: 30px;">Kind regards,<br><strong>{club}</strong></p>
  <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">
  <p style="font-size: 12px; color: #666;">If you want to unsubscribe, you can do so on the website.</p>
</div>"#,
            name = candidate.name,
            title = candidate.shift_title,
            date = date,
            start = start,
            end = end,
            club = self.email.club_name,
        );

        ReminderMessage {
            to: candidate.email.clone(),
            subject,
            text_body,
            html_body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    fn sample_candidate() -> ReminderCandidate {
        ReminderCandidate {
            registration_id: Uuid::new_v4(),
            shift_id: Uuid::new_v4(),
            name: "Jan Jansen".to_string(),
            email: "jan@example.com".to_string(),
            shift_title: "Saturday evening shift".to_string(),
            shift_date: NaiveDate::from_ymd_opt(2025, 8, 30).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
        }
    }

    fn sample_service() -> ReminderService {
        // The pool is never touched by render()
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");
        ReminderService::new(
            pool,
            Arc::new(domain::services::MockReminderMailer::new()),
            EmailConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_render_one_week_subject() {
        let service = sample_service();
        let message = service.render(&sample_candidate(), ReminderKind::OneWeek);
        assert_eq!(
            message.subject,
            "Reminder: bar shift next week - Saturday evening shift"
        );
    }

    #[tokio::test]
    async fn test_render_three_days_subject() {
        let service = sample_service();
        let message = service.render(&sample_candidate(), ReminderKind::ThreeDays);
        assert_eq!(
            message.subject,
            "Reminder: bar shift in 3 days - Saturday evening shift"
        );
    }

    #[tokio::test]
    async fn test_render_bodies_carry_shift_details() {
        let service = sample_service();
        let message = service.render(&sample_candidate(), ReminderKind::OneWeek);

        assert_eq!(message.to, "jan@example.com");
        assert!(message.text_body.contains("Hi Jan Jansen"));
        assert!(message.text_body.contains("Saturday evening shift"));
        assert!(message.text_body.contains("18:00 - 23:30"));
        assert!(message.text_body.contains("Saturday 30 August 2025"));
        assert!(message.html_body.contains("<strong>Time:</strong> 18:00 - 23:30"));
        assert!(message.html_body.contains("v.v. Boskant"));
    }
}
