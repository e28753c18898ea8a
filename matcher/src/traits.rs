//! Trait definitions with mockall annotations for testing
//!
//! Every external collaborator of the matching cycle sits behind one of these
//! traits: the five stores, the advisory cycle lock, the notification fan-out,
//! the opening-text strategy and the credential source. Real implementations
//! live in `services`; tests inject the generated mocks.

use chrono::{DateTime, Utc};
use std::time::Duration;

use shared::{
    Channel, CompatibilityScore, Member, MemberId, NewMessage, NewPairing, Notification, OpeningMessage, Pairing,
    PairingAnalytics, PairingId,
};

use crate::error::MatcherResult;
use crate::types::{GenerationFailure, OpenerContext, OpeningText};

/// Read access to the member pool plus the single field the cycle writes
#[mockall::automock]
#[async_trait::async_trait]
pub trait MemberStore: Send + Sync {
    /// Members with intake complete whose cooldown has elapsed at `now`.
    ///
    /// Errors here are fatal for the cycle.
    async fn list_eligible(&self, cooldown: Duration, now: DateTime<Utc>) -> MatcherResult<Vec<Member>>;

    /// Fetch a single member
    async fn get(&self, id: &MemberId) -> MatcherResult<Option<Member>>;

    /// Record that the member took part in a cycle
    async fn update_last_cycle_at(&self, id: &MemberId, timestamp: DateTime<Utc>) -> MatcherResult<()>;
}

/// Pairing persistence with an enforced unique index on unordered active pairs
#[mockall::automock]
#[async_trait::async_trait]
pub trait PairingStore: Send + Sync {
    /// Whether an active pairing exists for the unordered pair
    async fn exists(&self, a: &MemberId, b: &MemberId) -> MatcherResult<bool>;

    /// Insert a pairing; an index violation is reported as `DuplicatePairing`
    async fn create(&self, pairing: NewPairing) -> MatcherResult<Pairing>;

    async fn get(&self, id: &PairingId) -> MatcherResult<Option<Pairing>>;

    /// Flip `opening_message_sent` to true
    async fn mark_opening_sent(&self, id: &PairingId) -> MatcherResult<()>;
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn create(&self, pairing_id: &PairingId, score: &CompatibilityScore) -> MatcherResult<PairingAnalytics>;
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait ChannelStore: Send + Sync {
    async fn create(&self, pairing_id: &PairingId) -> MatcherResult<Channel>;
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait MessageStore: Send + Sync {
    async fn create(&self, message: NewMessage) -> MatcherResult<OpeningMessage>;
}

/// Advisory lock shared by every cycle invocation, held in the store rather
/// than in process memory so overlapping runs on different hosts see it
#[mockall::automock]
#[async_trait::async_trait]
pub trait CycleLock: Send + Sync {
    /// Take the lock for `holder` unless another unexpired holder owns it
    async fn try_acquire(&self, holder: &str, ttl: Duration, now: DateTime<Utc>) -> MatcherResult<bool>;

    /// Release the lock if `holder` still owns it
    async fn release(&self, holder: &str) -> MatcherResult<()>;
}

/// Fire-and-forget notification fan-out
#[mockall::automock]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> MatcherResult<()>;
}

/// Source of opening-message text for a new pairing
#[mockall::automock]
#[async_trait::async_trait]
pub trait OpeningTextStrategy: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn generate(&self, context: &OpenerContext) -> Result<OpeningText, GenerationFailure>;
}

/// Credential lookup for the external opener generation service
#[mockall::automock]
#[async_trait::async_trait]
pub trait ApiKeySource: Send + Sync {
    /// The generation API key, or `None` when generation is not configured
    async fn opener_api_key(&self) -> Option<String>;
}
