//! Pairing persistence saga
//!
//! Writes happen in order Pairing -> PairingAnalytics -> Channel without a
//! surrounding transaction. The Pairing row is load-bearing: if it fails
//! nothing else is attempted. Analytics and Channel are best-effort and their
//! failure leaves the pairing standing in a degraded state that is returned
//! to the caller instead of being rolled back.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use shared::{
    process_warn, Channel, NewPairing, Pairing, PairingAnalytics, PairingKind, PairingStatus, ProcessId,
};

use crate::error::{MatcherError, MatcherResult};
use crate::traits::{AnalyticsStore, ChannelStore, PairingStore};
use crate::types::PairingCandidate;

/// Outcome of a best-effort write
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactState<T> {
    Written(T),
    Failed(String),
}

impl<T> ArtifactState<T> {
    pub fn written(&self) -> Option<&T> {
        match self {
            ArtifactState::Written(value) => Some(value),
            ArtifactState::Failed(_) => None,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, ArtifactState::Written(_))
    }
}

/// A pairing that exists in the store, with the state of its artifacts
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedPairing {
    pub pairing: Pairing,
    pub analytics: ArtifactState<PairingAnalytics>,
    pub channel: ArtifactState<Channel>,
}

impl PersistedPairing {
    /// Pairing stands but at least one artifact is missing
    pub fn is_degraded(&self) -> bool {
        !self.analytics.is_written() || !self.channel.is_written()
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.written()
    }

    /// Human-readable descriptions of failed artifact writes
    pub fn artifact_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let ArtifactState::Failed(reason) = &self.analytics {
            errors.push(format!("pairing {}: analytics not recorded: {}", self.pairing.id, reason));
        }
        if let ArtifactState::Failed(reason) = &self.channel {
            errors.push(format!("pairing {}: channel not created: {}", self.pairing.id, reason));
        }
        errors
    }
}

pub struct MatchPersister {
    pairings: Arc<dyn PairingStore>,
    analytics: Arc<dyn AnalyticsStore>,
    channels: Arc<dyn ChannelStore>,
}

impl MatchPersister {
    pub fn new(
        pairings: Arc<dyn PairingStore>,
        analytics: Arc<dyn AnalyticsStore>,
        channels: Arc<dyn ChannelStore>,
    ) -> Self {
        Self {
            pairings,
            analytics,
            channels,
        }
    }

    /// Persist a candidate.
    ///
    /// Returns `DuplicatePairing` when an active pairing for the same
    /// unordered pair appeared since assignment (a concurrent cycle won the
    /// race); callers treat that as a skip.
    pub async fn persist(&self, candidate: &PairingCandidate, now: DateTime<Utc>) -> MatcherResult<PersistedPairing> {
        let a = candidate.member_a.id;
        let b = candidate.member_b.id;

        if self.pairings.exists(&a, &b).await? {
            return Err(MatcherError::DuplicatePairing { member_a: a, member_b: b });
        }

        let pairing = self
            .pairings
            .create(NewPairing {
                member_a: a,
                member_b: b,
                kind: PairingKind::Auto,
                status: PairingStatus::Active,
                created_at: now,
            })
            .await?;

        let analytics = match self.analytics.create(&pairing.id, &candidate.score).await {
            Ok(record) => ArtifactState::Written(record),
            Err(e) => {
                process_warn!(ProcessId::current(), "⚠️ Analytics write failed for pairing {}: {}", pairing.id, e);
                ArtifactState::Failed(e.to_string())
            }
        };

        let channel = match self.channels.create(&pairing.id).await {
            Ok(channel) => ArtifactState::Written(channel),
            Err(e) => {
                process_warn!(ProcessId::current(), "⚠️ Channel write failed for pairing {}: {}", pairing.id, e);
                ArtifactState::Failed(e.to_string())
            }
        };

        Ok(PersistedPairing {
            pairing,
            analytics,
            channel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CompatibilityScorer;
    use crate::traits::{MockAnalyticsStore, MockChannelStore, MockPairingStore};
    use assert_matches::assert_matches;
    use shared::{ChannelId, Member, MemberId, PairingId};

    fn candidate() -> PairingCandidate {
        let mut a = Member::blank(MemberId::new());
        a.affiliation = Some("uni".to_string());
        let mut b = Member::blank(MemberId::new());
        b.affiliation = Some("uni".to_string());
        let score = CompatibilityScorer::new().score(&a, &b);
        PairingCandidate {
            member_a: a,
            member_b: b,
            score,
        }
    }

    fn pairing_store(exists: bool) -> MockPairingStore {
        let mut store = MockPairingStore::new();
        store.expect_exists().returning(move |_, _| Ok(exists));
        store.expect_create().returning(|new| {
            Ok(Pairing {
                id: PairingId::new(),
                member_a: new.member_a,
                member_b: new.member_b,
                kind: new.kind,
                status: new.status,
                created_at: new.created_at,
                opening_message_sent: false,
            })
        });
        store
    }

    fn analytics_ok() -> MockAnalyticsStore {
        let mut store = MockAnalyticsStore::new();
        store.expect_create().returning(|id, score| {
            Ok(PairingAnalytics {
                pairing_id: *id,
                score: score.total(),
                breakdown: *score.breakdown(),
            })
        });
        store
    }

    fn channels_ok() -> MockChannelStore {
        let mut store = MockChannelStore::new();
        store.expect_create().returning(|id| {
            Ok(Channel {
                id: ChannelId::new(),
                pairing_id: *id,
            })
        });
        store
    }

    #[tokio::test]
    async fn test_persist_writes_all_artifacts() {
        let persister = MatchPersister::new(
            Arc::new(pairing_store(false)),
            Arc::new(analytics_ok()),
            Arc::new(channels_ok()),
        );
        let candidate = candidate();
        let persisted = persister.persist(&candidate, Utc::now()).await.unwrap();

        assert_eq!(persisted.pairing.kind, PairingKind::Auto);
        assert_eq!(persisted.pairing.status, PairingStatus::Active);
        assert!(!persisted.pairing.opening_message_sent);
        assert!(!persisted.is_degraded());
        assert_eq!(
            persisted.analytics.written().map(|a| a.score),
            Some(candidate.score.total())
        );
        assert_eq!(persisted.channel().map(|c| c.pairing_id), Some(persisted.pairing.id));
    }

    #[tokio::test]
    async fn test_duplicate_is_reported_before_any_write() {
        let mut pairings = MockPairingStore::new();
        pairings.expect_exists().returning(|_, _| Ok(true));
        pairings.expect_create().never();
        let mut analytics = MockAnalyticsStore::new();
        analytics.expect_create().never();
        let mut channels = MockChannelStore::new();
        channels.expect_create().never();

        let persister = MatchPersister::new(Arc::new(pairings), Arc::new(analytics), Arc::new(channels));
        let err = persister.persist(&candidate(), Utc::now()).await.unwrap_err();
        assert_matches!(err, MatcherError::DuplicatePairing { .. });
    }

    #[tokio::test]
    async fn test_pairing_write_failure_stops_the_saga() {
        let mut pairings = MockPairingStore::new();
        pairings.expect_exists().returning(|_, _| Ok(false));
        pairings
            .expect_create()
            .returning(|_| Err(MatcherError::write("pairing", "disk full")));
        let mut analytics = MockAnalyticsStore::new();
        analytics.expect_create().never();
        let mut channels = MockChannelStore::new();
        channels.expect_create().never();

        let persister = MatchPersister::new(Arc::new(pairings), Arc::new(analytics), Arc::new(channels));
        let err = persister.persist(&candidate(), Utc::now()).await.unwrap_err();
        assert_matches!(err, MatcherError::StoreWrite { entity: "pairing", .. });
    }

    #[tokio::test]
    async fn test_artifact_failures_leave_degraded_pairing() {
        let mut analytics = MockAnalyticsStore::new();
        analytics
            .expect_create()
            .returning(|_, _| Err(MatcherError::write("analytics", "constraint")));
        let mut channels = MockChannelStore::new();
        channels
            .expect_create()
            .returning(|_| Err(MatcherError::write("channel", "timeout")));

        let persister = MatchPersister::new(Arc::new(pairing_store(false)), Arc::new(analytics), Arc::new(channels));
        let persisted = persister.persist(&candidate(), Utc::now()).await.unwrap();

        assert!(persisted.is_degraded());
        assert!(persisted.channel().is_none());
        let errors = persisted.artifact_errors();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("analytics not recorded"));
        assert!(errors[1].contains("channel not created"));
    }

    #[tokio::test]
    async fn test_channel_failure_alone_keeps_analytics() {
        let mut channels = MockChannelStore::new();
        channels
            .expect_create()
            .returning(|_| Err(MatcherError::write("channel", "timeout")));

        let persister = MatchPersister::new(Arc::new(pairing_store(false)), Arc::new(analytics_ok()), Arc::new(channels));
        let persisted = persister.persist(&candidate(), Utc::now()).await.unwrap();

        assert!(persisted.analytics.is_written());
        assert!(persisted.is_degraded());
    }
}
