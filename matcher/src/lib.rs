//! Study-partner matching library
//!
//! Runs the auto-matching cycle: select eligible members, score every
//! same-affiliation pair, greedily assign mutually exclusive partners, persist
//! each pairing with its analytics and channel, and open the conversation with
//! a generated or templated first message.

pub mod cli;
pub mod core;
pub mod cycle;
pub mod error;
pub mod icebreaker;
pub mod persister;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use crate::core::{CompatibilityScorer, CyclePhase, EligibilityGate, MatchAssigner};
pub use cycle::{CycleOrchestrator, Stores, CYCLE_ALREADY_RUNNING};
pub use error::{MatcherError, MatcherResult};
pub use icebreaker::IcebreakerGenerator;
pub use persister::{MatchPersister, PersistedPairing};
pub use traits::{
    AnalyticsStore, ApiKeySource, ChannelStore, CycleLock, MemberStore, MessageStore, Notifier, OpeningTextStrategy,
    PairingStore,
};
pub use types::{GenerationFailure, OpenerContext, OpeningText, PairingCandidate};

use std::sync::Arc;

use services::{select_opening_strategy, LogNotifier, WebhookNotifier};
use shared::MatcherConfig;

/// Wire a cycle orchestrator with the real strategy and notifier chosen from
/// `config` and the credentials `keys` can find.
pub async fn build_orchestrator(
    config: MatcherConfig,
    stores: Stores,
    keys: &dyn ApiKeySource,
) -> MatcherResult<CycleOrchestrator> {
    config.validate()?;
    let strategy = select_opening_strategy(keys, &config).await;
    let notifier: Arc<dyn Notifier> = match &config.notify_webhook {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(LogNotifier),
    };
    Ok(CycleOrchestrator::new(config, stores, strategy, notifier))
}
