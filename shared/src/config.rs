//! Matching cycle configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::{SharedError, SharedResult};

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_MIN_SCORE: u32 = 40;
pub const DEFAULT_OPENER_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_OPENER_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENER_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(10 * 60);

/// Tunables for one matching cycle
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MatcherConfig {
    /// Minimum time since a member's last cycle before they are eligible again
    pub cooldown: Duration,
    /// Pairs scoring below this are never emitted
    pub min_score: u32,
    /// Upper bound for the external opener generation call
    pub opener_timeout: Duration,
    pub opener_model: String,
    pub opener_endpoint: String,
    /// Optional webhook receiving new-pairing notifications
    pub notify_webhook: Option<String>,
    /// Lifetime of the advisory cycle lock
    pub lock_ttl: Duration,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            min_score: DEFAULT_MIN_SCORE,
            opener_timeout: DEFAULT_OPENER_TIMEOUT,
            opener_model: DEFAULT_OPENER_MODEL.to_string(),
            opener_endpoint: DEFAULT_OPENER_ENDPOINT.to_string(),
            notify_webhook: None,
            lock_ttl: DEFAULT_LOCK_TTL,
        }
    }
}

impl MatcherConfig {
    /// Check ranges and URLs before a cycle is ever run
    pub fn validate(&self) -> SharedResult<()> {
        if self.min_score > 100 {
            return Err(invalid("min_score", self.min_score));
        }
        if chrono::Duration::from_std(self.cooldown).is_err() {
            return Err(invalid("cooldown", format!("{:?}", self.cooldown)));
        }
        if self.opener_timeout.is_zero() {
            return Err(invalid("opener_timeout", format!("{:?}", self.opener_timeout)));
        }
        if self.lock_ttl.is_zero() {
            return Err(invalid("lock_ttl", format!("{:?}", self.lock_ttl)));
        }
        if self.opener_model.trim().is_empty() {
            return Err(invalid("opener_model", "<empty>"));
        }
        Url::parse(&self.opener_endpoint).map_err(|_| invalid("opener_endpoint", &self.opener_endpoint))?;
        if let Some(webhook) = &self.notify_webhook {
            Url::parse(webhook).map_err(|_| invalid("notify_webhook", webhook))?;
        }
        Ok(())
    }
}

fn invalid(field: &str, value: impl ToString) -> SharedError {
    SharedError::InvalidConfig {
        field: field.to_string(),
        value: value.to_string(),
    }
}
