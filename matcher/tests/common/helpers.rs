//! Test helpers and builder patterns for matcher tests
//!
//! `CycleBuilder` wires a `CycleOrchestrator` over an `InMemoryStore` with the
//! template strategy and a recording notifier; individual seams can be
//! swapped for mocks or failing stand-ins.

use std::sync::{Arc, Mutex};

use shared::{Channel, MatcherConfig, Member, MemberId, NewPairing, Notification, Pairing, PairingId};

use matcher::services::{DeterministicTemplate, InMemoryStore, StoreSnapshot};
use matcher::{
    ChannelStore, CycleOrchestrator, MatcherError, MatcherResult, Notifier, OpeningTextStrategy, PairingStore, Stores,
};

/// Notifier that keeps everything it was asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> MatcherResult<()> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

/// Channel store that is always down
pub struct FailingChannels;

#[async_trait::async_trait]
impl ChannelStore for FailingChannels {
    async fn create(&self, _pairing_id: &PairingId) -> MatcherResult<Channel> {
        Err(MatcherError::write("channel", "channel service unavailable"))
    }
}

/// Pairing store whose existence check never sees anything, so only the
/// unique index of the wrapped store can reject a duplicate
pub struct BlindPairings {
    inner: Arc<InMemoryStore>,
}

impl BlindPairings {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl PairingStore for BlindPairings {
    async fn exists(&self, _a: &MemberId, _b: &MemberId) -> MatcherResult<bool> {
        Ok(false)
    }

    async fn create(&self, pairing: NewPairing) -> MatcherResult<Pairing> {
        PairingStore::create(self.inner.as_ref(), pairing).await
    }

    async fn get(&self, id: &PairingId) -> MatcherResult<Option<Pairing>> {
        PairingStore::get(self.inner.as_ref(), id).await
    }

    async fn mark_opening_sent(&self, id: &PairingId) -> MatcherResult<()> {
        self.inner.mark_opening_sent(id).await
    }
}

/// Builder for an orchestrator over an in-memory store
pub struct CycleBuilder {
    store: Arc<InMemoryStore>,
    stores: Stores,
    config: MatcherConfig,
    strategy: Arc<dyn OpeningTextStrategy>,
    notifier: Arc<RecordingNotifier>,
}

impl CycleBuilder {
    /// Orchestrator over a store seeded with `members`, in pool order
    pub fn new(members: impl IntoIterator<Item = Member>) -> Self {
        let snapshot = StoreSnapshot {
            members: members.into_iter().collect(),
            ..StoreSnapshot::default()
        };
        let store = Arc::new(InMemoryStore::from_snapshot(snapshot).unwrap());
        Self {
            stores: Stores::from_shared(store.clone()),
            store,
            config: MatcherConfig::default(),
            strategy: Arc::new(DeterministicTemplate::new()),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    pub fn with_config<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MatcherConfig),
    {
        setup(&mut self.config);
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn OpeningTextStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace individual store seams
    pub fn with_stores<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut Stores),
    {
        setup(&mut self.stores);
        self
    }

    pub fn store(&self) -> Arc<InMemoryStore> {
        self.store.clone()
    }

    pub fn build(self) -> (CycleOrchestrator, Arc<InMemoryStore>, Arc<RecordingNotifier>) {
        let orchestrator = CycleOrchestrator::new(
            self.config,
            self.stores,
            self.strategy,
            self.notifier.clone(),
        );
        (orchestrator, self.store, self.notifier)
    }
}
