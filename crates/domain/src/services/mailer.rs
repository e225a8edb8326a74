//! Reminder mailer seam.
//!
//! The scheduler decides *when* a reminder is due; delivery goes through this
//! trait so the dispatch logic can be exercised without a real email sink.

/// A rendered reminder ready for delivery.
#[derive(Debug, Clone)]
pub struct ReminderMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Result of a single delivery attempt.
#[derive(Debug, Clone)]
pub enum SendResult {
    /// The sink confirmed the message.
    Sent,
    /// Delivery is disabled by configuration; nothing left the process.
    Disabled,
    /// The sink refused or the request failed.
    Failed(String),
}

/// Delivery boundary for reminder emails.
#[async_trait::async_trait]
pub trait ReminderMailer: Send + Sync {
    async fn send(&self, message: ReminderMessage) -> SendResult;
}

/// Mock mailer for development and testing.
///
/// Records every message and never talks to a real sink.
#[derive(Debug, Default)]
pub struct MockReminderMailer {
    /// Whether to simulate delivery failures.
    pub simulate_failure: bool,
    sent: std::sync::Mutex<Vec<ReminderMessage>>,
}

impl MockReminderMailer {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
            sent: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Mock that fails every delivery.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Messages recorded so far.
    pub fn sent_messages(&self) -> Vec<ReminderMessage> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn sent_count(&self) -> usize {
        match self.sent.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

#[async_trait::async_trait]
impl ReminderMailer for MockReminderMailer {
    async fn send(&self, message: ReminderMessage) -> SendResult {
        if self.simulate_failure {
            tracing::warn!(
                to = %message.to,
                subject = %message.subject,
                "Mock mailer simulating delivery failure"
            );
            return SendResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Mock: would send reminder email"
        );

        if let Ok(mut guard) = self.sent.lock() {
            guard.push(message);
        }
        SendResult::Sent
    }
}
