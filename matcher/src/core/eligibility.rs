//! Eligibility: who may be matched in this cycle

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use shared::{process_debug, Member, ProcessId};

use crate::error::{MatcherError, MatcherResult};
use crate::traits::MemberStore;

/// Cutoff before which `last_cycle_at` must fall; `None` if `now - cooldown`
/// is not representable, in which case only never-cycled members qualify.
pub fn cooldown_cutoff(now: DateTime<Utc>, cooldown: Duration) -> Option<DateTime<Utc>> {
    let cooldown = chrono::Duration::from_std(cooldown).ok()?;
    now.checked_sub_signed(cooldown)
}

/// `intake_complete && (last_cycle_at is None || last_cycle_at < now - cooldown)`
pub fn is_eligible(member: &Member, now: DateTime<Utc>, cooldown: Duration) -> bool {
    if !member.intake_complete {
        return false;
    }
    match member.last_cycle_at {
        None => true,
        Some(last) => cooldown_cutoff(now, cooldown).is_some_and(|cutoff| last < cutoff),
    }
}

/// Reads the eligible pool from the member store
pub struct EligibilityGate {
    members: Arc<dyn MemberStore>,
    cooldown: Duration,
}

impl EligibilityGate {
    pub fn new(members: Arc<dyn MemberStore>, cooldown: Duration) -> Self {
        Self { members, cooldown }
    }

    /// Fetch the pool. Any store failure is reported as the fatal
    /// `MemberStoreUnavailable`.
    ///
    /// The predicate is re-applied to the store's answer so a lax store can
    /// never leak an incomplete intake into assignment.
    pub async fn fetch(&self, now: DateTime<Utc>) -> MatcherResult<Vec<Member>> {
        let listed = self
            .members
            .list_eligible(self.cooldown, now)
            .await
            .map_err(|e| match e {
                MatcherError::MemberStoreUnavailable { .. } => e,
                other => MatcherError::MemberStoreUnavailable {
                    message: other.to_string(),
                },
            })?;

        let listed_count = listed.len();
        let pool: Vec<Member> = listed
            .into_iter()
            .filter(|m| is_eligible(m, now, self.cooldown))
            .collect();

        if pool.len() != listed_count {
            process_debug!(
                ProcessId::current(),
                "Dropped {} ineligible members returned by the store",
                listed_count - pool.len()
            );
        }
        Ok(pool)
    }
}
