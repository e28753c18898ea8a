//! Matcher-specific error types

use shared::{MemberId, SharedError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    /// The one fatal class: the pool cannot be read, so no cycle can run
    #[error("Member store unreachable: {message}")]
    MemberStoreUnavailable { message: String },

    #[error("Active pairing already exists between {member_a} and {member_b}")]
    DuplicatePairing { member_a: MemberId, member_b: MemberId },

    #[error("Failed to write {entity}: {message}")]
    StoreWrite { entity: &'static str, message: String },

    #[error("Failed to read {entity}: {message}")]
    StoreRead { entity: &'static str, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Cycle lock store unavailable: {message}")]
    LockUnavailable { message: String },

    #[error("Notification delivery failed for {member_id}: {message}")]
    NotificationFailed { member_id: MemberId, message: String },

    #[error("Snapshot error at {path}: {message}")]
    SnapshotError { path: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl MatcherError {
    pub fn config(message: impl Into<String>) -> Self {
        MatcherError::ConfigurationError(message.into())
    }

    pub fn write(entity: &'static str, message: impl ToString) -> Self {
        MatcherError::StoreWrite {
            entity,
            message: message.to_string(),
        }
    }

    /// Whether this error aborts the whole cycle rather than a single pair
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MatcherError::MemberStoreUnavailable { .. } | MatcherError::LockUnavailable { .. }
        )
    }
}

pub type MatcherResult<T> = Result<T, MatcherError>;
