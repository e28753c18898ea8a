//! Matcher-internal value types passed between cycle stages

use shared::{CompatibilityScore, Member};
use thiserror::Error;

/// A pair emitted by the assigner, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct PairingCandidate {
    pub member_a: Member,
    pub member_b: Member,
    pub score: CompatibilityScore,
}

/// Everything an opening-text strategy may draw on
#[derive(Debug, Clone, PartialEq)]
pub struct OpenerContext {
    pub member_a: Member,
    pub member_b: Member,
    /// Normalized topics both members listed, in member A's order
    pub shared_topics: Vec<String>,
}

/// Text produced by a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningText {
    pub text: String,
    /// Upstream id of the generated suggestion, if one exists
    pub suggestion_id: Option<String>,
}

/// Why the external generation path did not produce text.
///
/// Never surfaces as a cycle error; every variant routes to the template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("no credentials configured")]
    MissingCredentials,

    #[error("timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned HTTP {0}")]
    Http(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
