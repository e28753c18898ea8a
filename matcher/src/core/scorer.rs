//! Pairwise compatibility scoring
//!
//! `score(a, b)` is pure and total: missing profile data lowers or
//! neutralizes a factor but never fails. Every factor is computed from a
//! symmetric function of both members, so `score(a, b) == score(b, a)`.
//! Two different known affiliations zero the whole breakdown.

use std::collections::BTreeMap;

use shared::{Availability, CompatibilityScore, Member, ScoreBreakdown};

use super::normalize;

pub const AFFILIATION_WEIGHT: u32 = 20;
pub const TOPIC_WEIGHT: u32 = 30;
pub const AVAILABILITY_WEIGHT: u32 = 20;
pub const AVAILABILITY_UNKNOWN: u32 = 10;

const STYLE_EXACT: u32 = 15;
const STYLE_COMPATIBLE: u32 = 10;
const STYLE_UNSET: u32 = 7;
const STYLE_OTHER: u32 = 5;

const GOAL_EXACT: u32 = 10;
const GOAL_COMPATIBLE: u32 = 8;
const GOAL_ANTAGONISTIC: u32 = 2;
const GOAL_NEUTRAL: u32 = 5;

const SENIORITY_MISSING: u32 = 2;
const SENIORITY_FAR: u32 = 1;

/// Interaction styles that work together without being identical
const COMPATIBLE_STYLES: &[(&str, &str)] = &[("quiet", "with_music"), ("group_discussion", "teach_each_other")];

const COMPATIBLE_GOALS: &[(&str, &str)] = &[("ace_exams", "understand_concepts")];
const ANTAGONISTIC_GOALS: &[(&str, &str)] = &[("ace_exams", "just_pass")];

/// Stateless scorer; a unit struct so it can be held by the assigner
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityScorer;

impl CompatibilityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Members at two different known affiliations score zero on every
    /// factor; they can never be partners.
    pub fn score(&self, a: &Member, b: &Member) -> CompatibilityScore {
        if affiliations_conflict(a, b) {
            return CompatibilityScore::from_breakdown(ScoreBreakdown::default());
        }
        let breakdown = ScoreBreakdown {
            affiliation: affiliation(a, b),
            topic_overlap: topic_overlap(&a.topics, &b.topics),
            availability_overlap: availability_overlap(&a.availability, &b.availability),
            style_match: style_match(a.interaction_style.as_deref(), b.interaction_style.as_deref()),
            goal_match: goal_match(a.goal.as_deref(), b.goal.as_deref()),
            seniority_proximity: seniority_proximity(a.seniority.as_deref(), b.seniority.as_deref()),
        };
        CompatibilityScore::from_breakdown(breakdown)
    }
}

fn weighted(ratio: f64, weight: u32) -> u32 {
    // f64::round is half-away-from-zero, i.e. half-up for non-negative input
    (ratio.clamp(0.0, 1.0) * f64::from(weight)).round() as u32
}

fn pair_in(table: &[(&str, &str)], a: &str, b: &str) -> bool {
    table
        .iter()
        .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
}

pub fn affiliation(a: &Member, b: &Member) -> u32 {
    match (
        normalize::affiliation(a.affiliation.as_deref()),
        normalize::affiliation(b.affiliation.as_deref()),
    ) {
        (Some(x), Some(y)) if x == y => AFFILIATION_WEIGHT,
        _ => 0,
    }
}

/// Both affiliations known and different after normalization
pub fn affiliations_conflict(a: &Member, b: &Member) -> bool {
    match (
        normalize::affiliation(a.affiliation.as_deref()),
        normalize::affiliation(b.affiliation.as_deref()),
    ) {
        (Some(x), Some(y)) => x != y,
        _ => false,
    }
}

pub fn topic_overlap(a: &[String], b: &[String]) -> u32 {
    let a = normalize::topics(a);
    let b = normalize::topics(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let shared = a.iter().filter(|t| b.contains(t)).count();
    if shared == 0 {
        return 0;
    }
    let smaller = a.len().min(b.len());
    weighted(shared as f64 / smaller as f64, TOPIC_WEIGHT)
}

/// One slot per normalized day. Keys differing only in case or spacing fold
/// together and the lexicographically smallest slot wins.
fn normalized_slots(availability: &Availability) -> BTreeMap<String, String> {
    let mut slots: BTreeMap<String, String> = BTreeMap::new();
    for (day, slot) in availability {
        let day = normalize::topic(day);
        let Some(slot) = normalize::label(Some(slot)) else {
            continue;
        };
        if day.is_empty() {
            continue;
        }
        slots
            .entry(day)
            .and_modify(|current| {
                if slot < *current {
                    *current = slot.clone();
                }
            })
            .or_insert(slot);
    }
    slots
}

pub fn availability_overlap(a: &Availability, b: &Availability) -> u32 {
    let a = normalized_slots(a);
    let b = normalized_slots(b);
    if a.is_empty() || b.is_empty() {
        return AVAILABILITY_UNKNOWN;
    }
    let same_slot_days = a
        .iter()
        .filter(|(day, slot)| b.get(*day) == Some(*slot))
        .count();
    let total_slots = (a.len() + b.len()) as f64;
    let denominator = (total_slots / 2.0).max(1.0);
    weighted(same_slot_days as f64 / denominator, AVAILABILITY_WEIGHT)
}

pub fn style_match(a: Option<&str>, b: Option<&str>) -> u32 {
    match (normalize::label(a), normalize::label(b)) {
        (Some(x), Some(y)) if x == y => STYLE_EXACT,
        (Some(x), Some(y)) if pair_in(COMPATIBLE_STYLES, &x, &y) => STYLE_COMPATIBLE,
        (Some(_), Some(_)) => STYLE_OTHER,
        _ => STYLE_UNSET,
    }
}

pub fn goal_match(a: Option<&str>, b: Option<&str>) -> u32 {
    match (normalize::label(a), normalize::label(b)) {
        (Some(x), Some(y)) if x == y => GOAL_EXACT,
        (Some(x), Some(y)) if pair_in(COMPATIBLE_GOALS, &x, &y) => GOAL_COMPATIBLE,
        (Some(x), Some(y)) if pair_in(ANTAGONISTIC_GOALS, &x, &y) => GOAL_ANTAGONISTIC,
        _ => GOAL_NEUTRAL,
    }
}

/// Map a seniority / proficiency label onto one ordered ladder.
///
/// Accepts a leading or embedded number ("2", "year 3", "3rd year") or a
/// known name.
pub fn seniority_level(raw: &str) -> Option<u32> {
    let label = normalize::label(Some(raw))?;
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if let Ok(level) = digits.parse::<u32>() {
        return Some(level);
    }
    let level = match label.as_str() {
        "freshman" | "first_year" | "first" | "beginner" => 1,
        "sophomore" | "second_year" | "second" | "intermediate" => 2,
        "junior" | "third_year" | "third" | "advanced" => 3,
        "senior" | "fourth_year" | "fourth" | "expert" => 4,
        "graduate" | "grad" | "masters" | "master" => 5,
        "phd" | "doctoral" | "doctorate" => 6,
        _ => return None,
    };
    Some(level)
}

pub fn seniority_proximity(a: Option<&str>, b: Option<&str>) -> u32 {
    let (a, b) = match (normalize::label(a), normalize::label(b)) {
        (Some(a), Some(b)) => (a, b),
        _ => return SENIORITY_MISSING,
    };
    match (seniority_level(&a), seniority_level(&b)) {
        (Some(x), Some(y)) => match x.abs_diff(y) {
            0 => 5,
            1 => 4,
            2 => 2,
            _ => SENIORITY_FAR,
        },
        _ => SENIORITY_FAR,
    }
}
