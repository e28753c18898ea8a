//! In-memory implementation of every store seam
//!
//! Backs the CLI runner and the HTTP host. State lives behind a single
//! `tokio::sync::RwLock` and can be loaded from and saved to a JSON snapshot.
//! The unordered-pair unique index over active pairings is enforced here, so
//! it remains the source of truth even if callers skip their own checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::sync::RwLock;

use shared::{
    process_debug, Channel, ChannelId, CompatibilityScore, Member, MemberId, MessageId, NewMessage, NewPairing,
    OpeningMessage, PairKey, Pairing, PairingAnalytics, PairingId, ProcessId,
};

use crate::core::eligibility::is_eligible;
use crate::error::{MatcherError, MatcherResult};
use crate::traits::{AnalyticsStore, ChannelStore, CycleLock, MemberStore, MessageStore, PairingStore};

/// On-disk form of the store
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub pairings: Vec<Pairing>,
    #[serde(default)]
    pub analytics: Vec<PairingAnalytics>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub messages: Vec<OpeningMessage>,
}

#[derive(Debug, Clone)]
struct Lease {
    holder: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Insertion order is the pool order handed to the assigner
    members: Vec<Member>,
    pairings: Vec<Pairing>,
    active_index: HashMap<PairKey, PairingId>,
    analytics: Vec<PairingAnalytics>,
    channels: Vec<Channel>,
    messages: Vec<OpeningMessage>,
    lease: Option<Lease>,
}

impl StoreState {
    fn member_mut(&mut self, id: &MemberId) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.id == *id)
    }

    fn pairing_mut(&mut self, id: &PairingId) -> Option<&mut Pairing> {
        self.pairings.iter_mut().find(|p| p.id == *id)
    }
}

#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Build from a snapshot, rebuilding the active-pair index.
    ///
    /// Two active pairings over the same unordered pair are rejected.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> MatcherResult<Self> {
        let mut active_index = HashMap::new();
        for pairing in snapshot.pairings.iter().filter(|p| p.is_active()) {
            if active_index.insert(pairing.key(), pairing.id).is_some() {
                return Err(MatcherError::DuplicatePairing {
                    member_a: pairing.member_a,
                    member_b: pairing.member_b,
                });
            }
        }

        Ok(Self {
            state: RwLock::new(StoreState {
                members: snapshot.members,
                pairings: snapshot.pairings,
                active_index,
                analytics: snapshot.analytics,
                channels: snapshot.channels,
                messages: snapshot.messages,
                lease: None,
            }),
        })
    }

    /// Load a snapshot file
    pub async fn load(path: &Path) -> MatcherResult<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| MatcherError::SnapshotError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content).map_err(|e| MatcherError::SnapshotError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        process_debug!(
            ProcessId::current(),
            "Loaded snapshot {} ({} members, {} pairings)",
            path.display(),
            snapshot.members.len(),
            snapshot.pairings.len()
        );
        Self::from_snapshot(snapshot)
    }

    /// Write the current state to `path` via a temporary sibling file
    pub async fn save(&self, path: &Path) -> MatcherResult<()> {
        let snapshot = self.snapshot().await;
        let content = serde_json::to_string_pretty(&snapshot)?;

        let temp_path = temp_path_for(path);
        fs::write(&temp_path, content)
            .await
            .map_err(|e| MatcherError::SnapshotError {
                path: temp_path.display().to_string(),
                message: e.to_string(),
            })?;
        fs::rename(&temp_path, path)
            .await
            .map_err(|e| MatcherError::SnapshotError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().await;
        StoreSnapshot {
            members: state.members.clone(),
            pairings: state.pairings.clone(),
            analytics: state.analytics.clone(),
            channels: state.channels.clone(),
            messages: state.messages.clone(),
        }
    }

    /// Insert or replace a member
    pub async fn upsert_member(&self, member: Member) {
        let mut state = self.state.write().await;
        match state.member_mut(&member.id) {
            Some(existing) => *existing = member,
            None => state.members.push(member),
        }
    }

    /// Dissolve a pairing, removing it from the unique index
    pub async fn dissolve(&self, id: &PairingId) -> MatcherResult<()> {
        let mut state = self.state.write().await;
        let pairing = state.pairing_mut(id).ok_or_else(|| MatcherError::NotFound {
            entity: "pairing",
            id: id.to_string(),
        })?;
        pairing.status = shared::PairingStatus::Dissolved;
        let key = pairing.key();
        if state.active_index.get(&key) == Some(id) {
            state.active_index.remove(&key);
        }
        Ok(())
    }

    pub async fn pairings(&self) -> Vec<Pairing> {
        self.state.read().await.pairings.clone()
    }

    pub async fn analytics(&self) -> Vec<PairingAnalytics> {
        self.state.read().await.analytics.clone()
    }

    pub async fn channels(&self) -> Vec<Channel> {
        self.state.read().await.channels.clone()
    }

    pub async fn messages(&self) -> Vec<OpeningMessage> {
        self.state.read().await.messages.clone()
    }

    pub async fn member(&self, id: &MemberId) -> Option<Member> {
        self.state.read().await.members.iter().find(|m| m.id == *id).cloned()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "snapshot.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait::async_trait]
impl MemberStore for InMemoryStore {
    async fn list_eligible(&self, cooldown: Duration, now: DateTime<Utc>) -> MatcherResult<Vec<Member>> {
        let state = self.state.read().await;
        Ok(state
            .members
            .iter()
            .filter(|m| is_eligible(m, now, cooldown))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &MemberId) -> MatcherResult<Option<Member>> {
        Ok(self.member(id).await)
    }

    async fn update_last_cycle_at(&self, id: &MemberId, timestamp: DateTime<Utc>) -> MatcherResult<()> {
        let mut state = self.state.write().await;
        let member = state.member_mut(id).ok_or_else(|| MatcherError::NotFound {
            entity: "member",
            id: id.to_string(),
        })?;
        member.last_cycle_at = Some(timestamp);
        Ok(())
    }
}

#[async_trait::async_trait]
impl PairingStore for InMemoryStore {
    async fn exists(&self, a: &MemberId, b: &MemberId) -> MatcherResult<bool> {
        Ok(self.state.read().await.active_index.contains_key(&PairKey::new(*a, *b)))
    }

    async fn create(&self, new: NewPairing) -> MatcherResult<Pairing> {
        let mut state = self.state.write().await;
        let pairing = Pairing {
            id: PairingId::new(),
            member_a: new.member_a,
            member_b: new.member_b,
            kind: new.kind,
            status: new.status,
            created_at: new.created_at,
            opening_message_sent: false,
        };

        if pairing.is_active() {
            let key = pairing.key();
            if state.active_index.contains_key(&key) {
                return Err(MatcherError::DuplicatePairing {
                    member_a: new.member_a,
                    member_b: new.member_b,
                });
            }
            state.active_index.insert(key, pairing.id);
        }

        state.pairings.push(pairing.clone());
        Ok(pairing)
    }

    async fn get(&self, id: &PairingId) -> MatcherResult<Option<Pairing>> {
        Ok(self.state.read().await.pairings.iter().find(|p| p.id == *id).cloned())
    }

    async fn mark_opening_sent(&self, id: &PairingId) -> MatcherResult<()> {
        let mut state = self.state.write().await;
        let pairing = state.pairing_mut(id).ok_or_else(|| MatcherError::NotFound {
            entity: "pairing",
            id: id.to_string(),
        })?;
        pairing.opening_message_sent = true;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AnalyticsStore for InMemoryStore {
    async fn create(&self, pairing_id: &PairingId, score: &CompatibilityScore) -> MatcherResult<PairingAnalytics> {
        let record = PairingAnalytics {
            pairing_id: *pairing_id,
            score: score.total(),
            breakdown: *score.breakdown(),
        };
        self.state.write().await.analytics.push(record.clone());
        Ok(record)
    }
}

#[async_trait::async_trait]
impl ChannelStore for InMemoryStore {
    async fn create(&self, pairing_id: &PairingId) -> MatcherResult<Channel> {
        let channel = Channel {
            id: ChannelId::new(),
            pairing_id: *pairing_id,
        };
        self.state.write().await.channels.push(channel.clone());
        Ok(channel)
    }
}

#[async_trait::async_trait]
impl MessageStore for InMemoryStore {
    async fn create(&self, message: NewMessage) -> MatcherResult<OpeningMessage> {
        let mut state = self.state.write().await;
        if !state.channels.iter().any(|c| c.id == message.channel_id) {
            return Err(MatcherError::NotFound {
                entity: "channel",
                id: message.channel_id.to_string(),
            });
        }
        let stored = OpeningMessage {
            id: MessageId::new(),
            channel_id: message.channel_id,
            author_id: message.author_id,
            content: message.content,
            is_generated: message.is_generated,
            source_suggestion_id: message.source_suggestion_id,
            created_at: Utc::now(),
        };
        state.messages.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait::async_trait]
impl CycleLock for InMemoryStore {
    async fn try_acquire(&self, holder: &str, ttl: Duration, now: DateTime<Utc>) -> MatcherResult<bool> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| MatcherError::LockUnavailable {
            message: format!("invalid lease length: {}", e),
        })?;
        let mut state = self.state.write().await;
        if let Some(lease) = &state.lease {
            if lease.holder != holder && lease.expires_at > now {
                return Ok(false);
            }
        }
        state.lease = Some(Lease {
            holder: holder.to_string(),
            expires_at: now + ttl,
        });
        Ok(true)
    }

    async fn release(&self, holder: &str) -> MatcherResult<()> {
        let mut state = self.state.write().await;
        if state.lease.as_ref().is_some_and(|lease| lease.holder == holder) {
            state.lease = None;
        }
        Ok(())
    }
}
