//! Core shared types and identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_string(s: &str) -> SharedResult<Self> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| SharedError::InvalidId { input: s.to_string() })
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a member of the pool
    MemberId
);
uuid_id!(
    /// Unique identifier for a persisted pairing
    PairingId
);
uuid_id!(
    /// Unique identifier for a pairing's communication channel
    ChannelId
);
uuid_id!(
    /// Unique identifier for a message inside a channel
    MessageId
);

/// Unordered pair of members, the key of the active-pairing unique index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    low: MemberId,
    high: MemberId,
}

impl PairKey {
    pub fn new(a: MemberId, b: MemberId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.low == *id || self.high == *id
    }
}

/// Weekly availability: day name -> chosen slot label (e.g. "monday" -> "evening")
pub type Availability = BTreeMap<String, String>;

/// A student in the matching pool.
///
/// Created and edited outside this system; the matcher only ever writes
/// `last_cycle_at`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub interaction_style: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub seniority: Option<String>,
    #[serde(default)]
    pub last_cycle_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub intake_complete: bool,
}

impl Member {
    /// A member with only an id; every profile field empty and intake incomplete
    pub fn blank(id: MemberId) -> Self {
        Self {
            id,
            display_name: None,
            affiliation: None,
            topics: Vec::new(),
            availability: Availability::new(),
            interaction_style: None,
            goal: None,
            seniority: None,
            last_cycle_at: None,
            intake_complete: false,
        }
    }

    /// Name used in prompts and notifications
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "your study partner".to_string())
    }
}

/// Per-factor contribution to a compatibility score
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub affiliation: u32,
    pub topic_overlap: u32,
    pub availability_overlap: u32,
    pub style_match: u32,
    pub goal_match: u32,
    pub seniority_proximity: u32,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> u32 {
        self.affiliation
            + self.topic_overlap
            + self.availability_overlap
            + self.style_match
            + self.goal_match
            + self.seniority_proximity
    }
}

/// Weighted 0-100 fit between two members. `total` always equals the breakdown sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CompatibilityScore {
    total: u32,
    breakdown: ScoreBreakdown,
}

impl CompatibilityScore {
    pub fn from_breakdown(breakdown: ScoreBreakdown) -> Self {
        Self {
            total: breakdown.sum(),
            breakdown,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }
}

/// How a pairing came about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingKind {
    Auto,
    Manual,
}

/// Lifecycle of a pairing; only `Active` pairings take part in the unique index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStatus {
    Pending,
    Active,
    Dissolved,
}

/// Pairing as requested from the pairing store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewPairing {
    pub member_a: MemberId,
    pub member_b: MemberId,
    pub kind: PairingKind,
    pub status: PairingStatus,
    pub created_at: DateTime<Utc>,
}

/// Persisted match between two members
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub id: PairingId,
    pub member_a: MemberId,
    pub member_b: MemberId,
    pub kind: PairingKind,
    pub status: PairingStatus,
    pub created_at: DateTime<Utc>,
    pub opening_message_sent: bool,
}

impl Pairing {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.member_a, self.member_b)
    }

    pub fn is_active(&self) -> bool {
        self.status == PairingStatus::Active
    }
}

/// Score record written alongside a pairing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairingAnalytics {
    pub pairing_id: PairingId,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
}

/// Message container for a pairing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub pairing_id: PairingId,
}

/// Message as requested from the message store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub channel_id: ChannelId,
    pub author_id: MemberId,
    pub content: String,
    pub is_generated: bool,
    pub source_suggestion_id: Option<String>,
}

/// First message inserted into a new pairing's channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpeningMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author_id: MemberId,
    pub content: String,
    pub is_generated: bool,
    pub source_suggestion_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
