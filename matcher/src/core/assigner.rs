//! Greedy one-pass assignment with a mutual-exclusion set
//!
//! Members are visited in pool order. Each unassigned member takes its
//! highest-scoring unassigned same-affiliation partner that clears the
//! minimum score; both are then excluded for the rest of the pass. Ties go to
//! the candidate seen first in the pool. This commits to local choices and is
//! not a maximum-weight matching.

use std::collections::HashSet;

use shared::{process_debug, process_warn, CompatibilityScore, Member, MemberId, ProcessId};

use super::normalize;
use super::scorer::CompatibilityScorer;
use crate::traits::PairingStore;
use crate::types::PairingCandidate;

/// Why a member left the pass without a partner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nobody unassigned, same-affiliation and not already paired with them
    NoCandidates,
    /// Candidates existed but the best one scored below the minimum
    BelowThreshold { best: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMember {
    pub member_id: MemberId,
    pub reason: SkipReason,
}

/// Result of one assignment pass
#[derive(Debug, Default)]
pub struct Assignment {
    pub pairs: Vec<PairingCandidate>,
    pub skipped: Vec<SkippedMember>,
    /// Existing-pairing lookups that failed; the candidate was excluded
    pub lookup_errors: Vec<String>,
}

impl Assignment {
    /// Members placed into a pair this pass
    pub fn assigned_ids(&self) -> HashSet<MemberId> {
        self.pairs
            .iter()
            .flat_map(|p| [p.member_a.id, p.member_b.id])
            .collect()
    }
}

pub struct MatchAssigner {
    scorer: CompatibilityScorer,
    min_score: u32,
}

impl MatchAssigner {
    pub fn new(scorer: CompatibilityScorer, min_score: u32) -> Self {
        Self { scorer, min_score }
    }

    pub fn min_score(&self) -> u32 {
        self.min_score
    }

    /// Run the pass. `existing` is consulted lazily, once per candidate pair,
    /// so pairings written by a concurrent cycle are seen as late as possible.
    pub async fn assign(&self, pool: &[Member], existing: &dyn PairingStore) -> Assignment {
        let mut used: HashSet<MemberId> = HashSet::new();
        let mut assignment = Assignment::default();

        for member in pool {
            if used.contains(&member.id) {
                continue;
            }

            match self.best_partner(member, pool, &used, existing, &mut assignment.lookup_errors).await {
                Ok((partner, score)) => {
                    process_debug!(
                        ProcessId::current(),
                        "Paired {} with {} (score {})",
                        member.id,
                        partner.id,
                        score.total()
                    );
                    used.insert(member.id);
                    used.insert(partner.id);
                    assignment.pairs.push(PairingCandidate {
                        member_a: member.clone(),
                        member_b: partner.clone(),
                        score,
                    });
                }
                Err(reason) => {
                    process_debug!(ProcessId::current(), "No match for {} this cycle: {:?}", member.id, reason);
                    assignment.skipped.push(SkippedMember {
                        member_id: member.id,
                        reason,
                    });
                }
            }
        }

        assignment
    }

    async fn best_partner<'p>(
        &self,
        member: &Member,
        pool: &'p [Member],
        used: &HashSet<MemberId>,
        existing: &dyn PairingStore,
        lookup_errors: &mut Vec<String>,
    ) -> Result<(&'p Member, CompatibilityScore), SkipReason> {
        let affiliation = normalize::affiliation(member.affiliation.as_deref()).ok_or(SkipReason::NoCandidates)?;

        let mut candidates: Vec<&Member> = Vec::new();
        for candidate in pool {
            if candidate.id == member.id || used.contains(&candidate.id) {
                continue;
            }
            if normalize::affiliation(candidate.affiliation.as_deref()).as_ref() != Some(&affiliation) {
                continue;
            }
            match existing.exists(&member.id, &candidate.id).await {
                Ok(false) => candidates.push(candidate),
                Ok(true) => {}
                Err(e) => {
                    process_warn!(
                        ProcessId::current(),
                        "Existing-pairing lookup failed for {} / {}: {}",
                        member.id,
                        candidate.id,
                        e
                    );
                    lookup_errors.push(format!(
                        "could not check existing pairing between {} and {}: {}",
                        member.id, candidate.id, e
                    ));
                }
            }
        }

        if candidates.is_empty() {
            return Err(SkipReason::NoCandidates);
        }

        let mut scored: Vec<(&Member, CompatibilityScore)> = candidates
            .into_iter()
            .map(|c| (c, self.scorer.score(member, c)))
            .collect();
        let best_seen = scored.iter().map(|(_, s)| s.total()).max().unwrap_or(0);

        scored.retain(|(_, s)| s.total() >= self.min_score);
        // Stable sort: equal totals keep pool order, so the first seen wins
        scored.sort_by(|x, y| y.1.total().cmp(&x.1.total()));

        scored
            .into_iter()
            .next()
            .ok_or(SkipReason::BelowThreshold { best: best_seen })
    }
}
