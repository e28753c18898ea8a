//! Notification fan-out implementations

use std::time::Duration;

use shared::{process_info, Notification, ProcessId};

use crate::error::{MatcherError, MatcherResult};
use crate::traits::Notifier;

pub const NEW_PARTNER_TITLE: &str = "You have a new study partner!";

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Writes notifications to the log only
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> MatcherResult<()> {
        process_info!(
            ProcessId::current(),
            "🔔 {} -> {}: {}",
            notification.title,
            notification.member_id,
            notification.body
        );
        Ok(())
    }
}

/// POSTs each notification as JSON to a fixed URL
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, WEBHOOK_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, url: url.into() }
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: Notification) -> MatcherResult<()> {
        let member_id = notification.member_id;
        let response = self
            .client
            .post(&self.url)
            .json(&notification)
            .send()
            .await
            .map_err(|e| MatcherError::NotificationFailed {
                member_id,
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(MatcherError::NotificationFailed {
                member_id,
                message: format!("webhook returned {}", response.status()),
            });
        }
        Ok(())
    }
}
