//! Messages crossing a process boundary: the cycle trigger response and
//! the notification fan-out payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::MemberId;

/// Outcome of one matching cycle
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CycleSummary {
    pub matches_created: u32,
    pub errors: Vec<String>,
    pub members_considered: u32,
    pub unmatched: u32,
    pub opening_messages_sent: u32,
    pub degraded_pairings: u32,
}

/// Body returned by `POST /cycle`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum CycleResponse {
    Completed {
        success: bool,
        #[serde(rename = "matchesCreated")]
        matches_created: u32,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        errors: Option<Vec<String>>,
    },
    Failed {
        success: bool,
        error: String,
    },
}

impl CycleResponse {
    pub fn completed(summary: &CycleSummary) -> Self {
        CycleResponse::Completed {
            success: true,
            matches_created: summary.matches_created,
            errors: if summary.errors.is_empty() {
                None
            } else {
                Some(summary.errors.clone())
            },
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        CycleResponse::Failed {
            success: false,
            error: error.to_string(),
        }
    }
}

/// Payload handed to the notification fan-out
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Notification {
    pub member_id: MemberId,
    pub title: String,
    pub body: String,
    pub data: Value,
}
