//! One full matching cycle
//!
//! Lock -> EligibilityGate -> MatchAssigner -> (MatchPersister + icebreaker +
//! cooldown update) per pair -> notification fan-out -> unlock. Only the gate
//! and the lock store can fail the cycle; everything after assignment is
//! collected into the summary.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use shared::{
    logging, process_info, process_warn, CycleSummary, MatcherConfig, Member, Notification, ProcessId,
};

use crate::core::{CompatibilityScorer, CyclePhase, CycleState, EligibilityGate, MatchAssigner};
use crate::error::{MatcherError, MatcherResult};
use crate::icebreaker::IcebreakerGenerator;
use crate::persister::{MatchPersister, PersistedPairing};
use crate::services::memory_store::InMemoryStore;
use crate::services::notifier::NEW_PARTNER_TITLE;
use crate::traits::{
    AnalyticsStore, ChannelStore, CycleLock, MemberStore, MessageStore, Notifier, OpeningTextStrategy,
    PairingStore,
};
use crate::types::PairingCandidate;

pub const CYCLE_ALREADY_RUNNING: &str = "another matching cycle is already running";

/// Every store seam the cycle touches
#[derive(Clone)]
pub struct Stores {
    pub members: Arc<dyn MemberStore>,
    pub pairings: Arc<dyn PairingStore>,
    pub analytics: Arc<dyn AnalyticsStore>,
    pub channels: Arc<dyn ChannelStore>,
    pub messages: Arc<dyn MessageStore>,
    pub lock: Arc<dyn CycleLock>,
}

impl Stores {
    /// All seams served by one in-memory store
    pub fn from_shared(store: Arc<InMemoryStore>) -> Self {
        Self {
            members: store.clone(),
            pairings: store.clone(),
            analytics: store.clone(),
            channels: store.clone(),
            messages: store.clone(),
            lock: store,
        }
    }
}

pub struct CycleOrchestrator {
    config: MatcherConfig,
    members: Arc<dyn MemberStore>,
    lock: Arc<dyn CycleLock>,
    pairings: Arc<dyn PairingStore>,
    gate: EligibilityGate,
    assigner: MatchAssigner,
    persister: MatchPersister,
    icebreaker: IcebreakerGenerator,
    notifier: Arc<dyn Notifier>,
}

impl CycleOrchestrator {
    pub fn new(
        config: MatcherConfig,
        stores: Stores,
        strategy: Arc<dyn OpeningTextStrategy>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let gate = EligibilityGate::new(stores.members.clone(), config.cooldown);
        let assigner = MatchAssigner::new(CompatibilityScorer::new(), config.min_score);
        let persister = MatchPersister::new(stores.pairings.clone(), stores.analytics, stores.channels);
        let icebreaker =
            IcebreakerGenerator::new(strategy, config.opener_timeout, stores.messages, stores.pairings.clone());

        Self {
            config,
            members: stores.members,
            lock: stores.lock,
            pairings: stores.pairings,
            gate,
            assigner,
            persister,
            icebreaker,
            notifier,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub async fn run_cycle(&self) -> MatcherResult<CycleSummary> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle as of `now`.
    ///
    /// `Err` is returned only for fatal failures (member store or lock store
    /// unreachable). An overlapping invocation returns an empty summary
    /// carrying [`CYCLE_ALREADY_RUNNING`].
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> MatcherResult<CycleSummary> {
        let holder = format!("cycle-{}", uuid::Uuid::new_v4());

        let acquired = self
            .lock
            .try_acquire(&holder, self.config.lock_ttl, now)
            .await
            .map_err(|e| match e {
                MatcherError::LockUnavailable { .. } => e,
                other => MatcherError::LockUnavailable {
                    message: other.to_string(),
                },
            })?;

        if !acquired {
            process_warn!(ProcessId::current(), "⏳ Skipping cycle: {}", CYCLE_ALREADY_RUNNING);
            return Ok(CycleSummary {
                errors: vec![CYCLE_ALREADY_RUNNING.to_string()],
                ..CycleSummary::default()
            });
        }

        let result = self.run_locked(now).await;

        if let Err(e) = self.lock.release(&holder).await {
            logging::log_error(ProcessId::current(), "Cycle lock release", &e);
        }
        result
    }

    async fn run_locked(&self, now: DateTime<Utc>) -> MatcherResult<CycleSummary> {
        let mut state = CycleState::new(now);

        state.transition(CyclePhase::Fetching);
        let pool = match self.gate.fetch(now).await {
            Ok(pool) => pool,
            Err(e) => {
                state.transition(CyclePhase::FatalError);
                logging::log_error(ProcessId::current(), "Eligibility fetch", &e);
                return Err(e);
            }
        };
        state.summary_mut().members_considered = pool.len() as u32;
        logging::log_progress(ProcessId::current(), "Cycle", &format!("{} eligible members", pool.len()));

        state.transition(CyclePhase::Assigning);
        let assignment = self.assigner.assign(&pool, self.pairings.as_ref()).await;
        for error in &assignment.lookup_errors {
            state.record_error(error.clone());
        }

        state.transition(CyclePhase::Persisting {
            completed: 0,
            total: assignment.pairs.len(),
        });
        let mut created: Vec<(&PairingCandidate, PersistedPairing)> = Vec::new();
        for candidate in &assignment.pairs {
            if let Some(persisted) = self.process_pair(candidate, now, &mut state).await {
                created.push((candidate, persisted));
            }
            state.pair_finished();
        }

        state.transition(CyclePhase::Notifying);
        for (candidate, persisted) in &created {
            self.notify_pair(candidate, persisted).await;
        }

        let matched = created.len() as u32 * 2;
        let summary = state.summary_mut();
        summary.unmatched = summary.members_considered.saturating_sub(matched);

        let summary = state.finish();
        logging::log_success(
            ProcessId::current(),
            &format!(
                "Cycle done: {} matches, {} unmatched, {} openers, {} degraded, {} errors",
                summary.matches_created,
                summary.unmatched,
                summary.opening_messages_sent,
                summary.degraded_pairings,
                summary.errors.len()
            ),
        );
        Ok(summary)
    }

    /// Persist one pair and run its per-pair follow-ups. `None` when the
    /// Pairing itself was not written.
    async fn process_pair(
        &self,
        candidate: &PairingCandidate,
        now: DateTime<Utc>,
        state: &mut CycleState,
    ) -> Option<PersistedPairing> {
        let a = &candidate.member_a;
        let b = &candidate.member_b;

        let persisted = match self.persister.persist(candidate, now).await {
            Ok(persisted) => persisted,
            Err(MatcherError::DuplicatePairing { .. }) => {
                process_info!(ProcessId::current(), "↩️ Pair {} / {} already matched; skipping", a.id, b.id);
                state.record_error(format!("skipped {} and {}: active pairing already exists", a.id, b.id));
                return None;
            }
            Err(e) => {
                process_warn!(ProcessId::current(), "⚠️ Pairing write failed for {} / {}: {}", a.id, b.id, e);
                state.record_error(format!("failed to create pairing for {} and {}: {}", a.id, b.id, e));
                return None;
            }
        };

        let summary = state.summary_mut();
        summary.matches_created += 1;
        // Artifact failures leave the pairing standing; they are counted, not listed
        if persisted.is_degraded() {
            summary.degraded_pairings += 1;
            process_warn!(
                ProcessId::current(),
                "⚠️ Degraded pairing: {}",
                persisted.artifact_errors().join("; ")
            );
        }

        match persisted.channel() {
            Some(channel) => {
                if self
                    .icebreaker
                    .generate(&persisted.pairing, channel, a, b)
                    .await
                    .is_some()
                {
                    state.summary_mut().opening_messages_sent += 1;
                }
            }
            None => {
                process_warn!(
                    ProcessId::current(),
                    "⚠️ Pairing {} has no channel; opening message skipped",
                    persisted.pairing.id
                );
            }
        }

        for member in [a, b] {
            if let Err(e) = self.members.update_last_cycle_at(&member.id, now).await {
                process_warn!(ProcessId::current(), "⚠️ Cooldown update failed for {}: {}", member.id, e);
                state.record_error(format!("failed to update last cycle time for {}: {}", member.id, e));
            }
        }

        Some(persisted)
    }

    async fn notify_pair(&self, candidate: &PairingCandidate, persisted: &PersistedPairing) {
        let a = &candidate.member_a;
        let b = &candidate.member_b;
        for (member, partner) in [(a, b), (b, a)] {
            let notification = new_partner_notification(member, partner, persisted);
            if let Err(e) = self.notifier.notify(notification).await {
                process_warn!(ProcessId::current(), "⚠️ Notification to {} failed: {}", member.id, e);
            }
        }
    }
}

fn new_partner_notification(member: &Member, partner: &Member, persisted: &PersistedPairing) -> Notification {
    Notification {
        member_id: member.id,
        title: NEW_PARTNER_TITLE.to_string(),
        body: format!("You've been matched with {}. Say hi!", partner.label()),
        data: json!({
            "type": "new_match",
            "pairing_id": persisted.pairing.id,
            "partner_id": partner.id,
            "channel_id": persisted.channel().map(|c| c.id),
        }),
    }
}
