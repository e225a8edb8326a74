//! Email sink for reminder delivery.
//!
//! Supported providers:
//! - `console`: Logs emails to console (development)
//! - `resend`: Posts to the Resend HTTP API

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use domain::services::{ReminderMailer, ReminderMessage, SendResult};

use crate::config::EmailConfig;

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email service for sending reminder emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Check if email sending is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// The configured provider name.
    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    /// Whether the configured provider has everything it needs to send.
    pub fn is_configured(&self) -> bool {
        match self.config.provider.as_str() {
            "console" => true,
            "resend" => !self.config.resend_api_key.is_empty(),
            _ => false,
        }
    }

    /// Console provider - logs the email to the log stream (for development).
    async fn send_console(&self, message: &ReminderMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "Email (console provider)"
        );

        debug!(
            body_text = %message.text_body,
            body_html_length = message.html_body.len(),
            "Email body"
        );

        Ok(())
    }

    /// Resend provider - posts to the Resend HTTP API.
    async fn send_resend(&self, message: &ReminderMessage) -> Result<(), EmailError> {
        if self.config.resend_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let body = serde_json::json!({
            "from": format!("{} <{}>", self.config.sender_name, self.config.sender_email),
            "to": [message.to],
            "subject": message.subject,
            "text": message.text_body,
            "html": message.html_body,
        });

        let client = reqwest::Client::new();
        let response = client
            .post("https://api.resend.com/emails")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.resend_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("Resend request failed: {}", e)))?;

        if response.status().is_success() {
            info!(
                to = %message.to,
                subject = %message.subject,
                "Email sent via Resend"
            );
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "Resend API error"
            );
            Err(EmailError::ProviderError(format!(
                "Resend returned {}: {}",
                status, error_body
            )))
        }
    }
}

#[async_trait::async_trait]
impl ReminderMailer for EmailService {
    async fn send(&self, message: ReminderMessage) -> SendResult {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email sending disabled, skipping send"
            );
            return SendResult::Disabled;
        }

        let result = match self.config.provider.as_str() {
            "console" => self.send_console(&message).await,
            "resend" => self.send_resend(&message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        };

        match result {
            Ok(()) => SendResult::Sent,
            Err(e) => SendResult::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            resend_api_key: String::new(),
            sender_email: "test@example.com".to_string(),
            sender_name: "Test".to_string(),
            club_name: "Test Club".to_string(),
        }
    }

    fn test_message() -> ReminderMessage {
        ReminderMessage {
            to: "user@example.com".to_string(),
            subject: "Test Subject".to_string(),
            text_body: "Test body".to_string(),
            html_body: "<p>Test body</p>".to_string(),
        }
    }

    #[test]
    fn test_email_service_creation() {
        let service = EmailService::new(test_config());
        assert!(service.is_enabled());
        assert_eq!(service.provider(), "console");
        assert!(service.is_configured());
    }

    #[test]
    fn test_resend_unconfigured_without_key() {
        let mut config = test_config();
        config.provider = "resend".to_string();
        let service = EmailService::new(config);
        assert!(!service.is_configured());
    }

    #[test]
    fn test_unknown_provider_not_configured() {
        let mut config = test_config();
        config.provider = "carrier-pigeon".to_string();
        let service = EmailService::new(config);
        assert!(!service.is_configured());
    }

    #[tokio::test]
    async fn test_send_console_email() {
        let service = EmailService::new(test_config());
        let result = service.send(test_message()).await;
        assert!(matches!(result, SendResult::Sent));
    }

    #[tokio::test]
    async fn test_send_disabled_short_circuits() {
        let mut config = test_config();
        config.enabled = false;
        let service = EmailService::new(config);

        let result = service.send(test_message()).await;
        assert!(matches!(result, SendResult::Disabled));
    }

    #[tokio::test]
    async fn test_send_unknown_provider_fails() {
        let mut config = test_config();
        config.provider = "carrier-pigeon".to_string();
        let service = EmailService::new(config);

        let result = service.send(test_message()).await;
        assert!(matches!(result, SendResult::Failed(_)));
    }
}
