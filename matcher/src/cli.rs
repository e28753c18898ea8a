//! Command-line arguments shared by the matcher and webserver binaries

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use shared::config::{DEFAULT_OPENER_ENDPOINT, DEFAULT_OPENER_MODEL};
use shared::{MatcherConfig, SharedError, SharedResult};

/// Cycle tuning flags, flattened into each binary's argument struct
#[derive(Args, Debug, Clone)]
pub struct CycleArgs {
    /// JSON snapshot holding members and pairings
    #[arg(long, env = "MATCHER_DATA")]
    pub data: PathBuf,

    /// Hours a member must wait after a cycle before being matched again
    #[arg(long, env = "MATCHER_COOLDOWN_HOURS", default_value = "24")]
    pub cooldown_hours: u64,

    /// Minimum compatibility score (0-100) for a pair to be emitted
    #[arg(long, env = "MATCHER_MIN_SCORE", default_value = "40")]
    pub min_score: u32,

    /// Timeout for the external opener generation call, in seconds
    #[arg(long, default_value = "8")]
    pub opener_timeout_secs: u64,

    /// Chat model used for opener generation
    #[arg(long, default_value = DEFAULT_OPENER_MODEL)]
    pub opener_model: String,

    /// Chat completions endpoint used for opener generation
    #[arg(long, default_value = DEFAULT_OPENER_ENDPOINT)]
    pub opener_endpoint: String,

    /// Webhook receiving new-pairing notifications (logged only when unset)
    #[arg(long, env = "MATCHER_NOTIFY_WEBHOOK")]
    pub notify_webhook: Option<String>,

    /// Lifetime of the advisory cycle lock, in seconds
    #[arg(long, default_value = "600")]
    pub lock_ttl_secs: u64,
}

impl CycleArgs {
    /// Convert the flags into a validated config
    pub fn to_config(&self) -> SharedResult<MatcherConfig> {
        let cooldown_secs = self
            .cooldown_hours
            .checked_mul(60 * 60)
            .ok_or_else(|| SharedError::InvalidConfig {
                field: "cooldown_hours".to_string(),
                value: self.cooldown_hours.to_string(),
            })?;
        let config = MatcherConfig {
            cooldown: Duration::from_secs(cooldown_secs),
            min_score: self.min_score,
            opener_timeout: Duration::from_secs(self.opener_timeout_secs),
            opener_model: self.opener_model.clone(),
            opener_endpoint: self.opener_endpoint.clone(),
            notify_webhook: self.notify_webhook.clone(),
            lock_ttl: Duration::from_secs(self.lock_ttl_secs),
        };
        config.validate()?;
        Ok(config)
    }
}
