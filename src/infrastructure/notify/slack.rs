//! Slack webhook delivery.

use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use crate::shared::errors::NotifyError;

const SEND_TIMEOUT_SECS: u64 = 10;

/// Posts digest messages to a Slack incoming webhook. Without a configured
/// URL the message is logged instead, which keeps local runs useful.
pub struct SlackNotifier {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: Option<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::WebhookFailed(e.to_string()))?;
        Ok(Self {
            webhook_url,
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = match &self.webhook_url {
            Some(url) => url,
            None => {
                info!("No webhook configured, printing message instead:\n{}", text);
                return Ok(());
            }
        };

        let response = self
            .client
            .post(url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| NotifyError::WebhookFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Slack webhook returned {}", status);
            return Err(NotifyError::WebhookStatus(status.as_u16()));
        }

        info!("✓ Notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_notifier_logs_and_succeeds() {
        let notifier = SlackNotifier::new(None).unwrap();
        assert!(!notifier.is_configured());
        assert!(notifier.send("hello").await.is_ok());
    }

    #[test]
    fn test_configured_flag() {
        let notifier =
            SlackNotifier::new(Some("https://hooks.slack.com/services/T/B/X".to_string())).unwrap();
        assert!(notifier.is_configured());
    }
}
