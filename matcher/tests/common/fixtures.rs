//! Test fixtures and data for matcher tests
//!
//! Member profiles used by the scenario and property suites.

use chrono::{DateTime, TimeZone, Utc};
use shared::{Member, MemberId};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Standard member ids using proper UUID format
    pub const ALICE: &'static str = "550e8400-e29b-41d4-a716-446655440001";
    pub const BOB: &'static str = "550e8400-e29b-41d4-a716-446655440002";
    pub const CAROL: &'static str = "550e8400-e29b-41d4-a716-446655440003";
    pub const DAVE: &'static str = "550e8400-e29b-41d4-a716-446655440004";

    pub const STATE_UNIVERSITY: &'static str = "State University";
    pub const TECH_INSTITUTE: &'static str = "Tech Institute";

    pub fn id(raw: &str) -> MemberId {
        MemberId::from_string(raw).unwrap()
    }

    /// Fixed cycle time so cooldown arithmetic is reproducible
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 14, 6, 0, 0).unwrap()
    }

    /// Intake-complete member with only an affiliation
    pub fn member(raw_id: &str, affiliation: &str) -> Member {
        let mut member = Member::blank(Self::id(raw_id));
        member.intake_complete = true;
        member.affiliation = Some(affiliation.to_string());
        member
    }

    /// CS student at State University, quiet style, aiming to ace exams
    pub fn cs_student(raw_id: &str, name: &str) -> Member {
        let mut member = Self::member(raw_id, Self::STATE_UNIVERSITY);
        member.display_name = Some(name.to_string());
        member.topics = vec![
            "Data Structures".to_string(),
            "Algorithms".to_string(),
            "Operating Systems".to_string(),
        ];
        member.interaction_style = Some("quiet".to_string());
        member.goal = Some("ace_exams".to_string());
        member.seniority = Some("junior".to_string());
        member
    }

    /// Alice and Bob: same school, two of three topics shared, compatible goals.
    ///
    /// Expected breakdown: affiliation 20, topics 20, availability 10 (unknown),
    /// style 15, goal 8, seniority 5 = 78.
    pub fn near_identical_pair() -> (Member, Member) {
        let alice = Self::cs_student(Self::ALICE, "Alice");
        let mut bob = Self::cs_student(Self::BOB, "Bob");
        bob.topics = vec![
            "data structures".to_string(),
            "algorithms".to_string(),
            "Machine Learning".to_string(),
        ];
        bob.goal = Some("understand_concepts".to_string());
        (alice, bob)
    }

    /// Two profiles equal in every field but id; availability left unknown.
    ///
    /// Expected total: 20 + 30 + 10 + 15 + 10 + 5 = 90.
    pub fn identical_pair() -> (Member, Member) {
        (
            Self::cs_student(Self::ALICE, "Alice"),
            Self::cs_student(Self::BOB, "Bob"),
        )
    }

    /// The same profile at two different schools
    pub fn cross_affiliation_pair() -> (Member, Member) {
        let alice = Self::cs_student(Self::ALICE, "Alice");
        let mut carol = Self::cs_student(Self::CAROL, "Carol");
        carol.affiliation = Some(Self::TECH_INSTITUTE.to_string());
        (alice, carol)
    }

    /// Profiles whose availability keys differ only in case or spacing
    pub fn case_variant_availability_members() -> Vec<Member> {
        let entries: [&[(&str, &str)]; 4] = [
            &[("Monday", "evening"), ("monday", "evening")],
            &[("monday", "evening")],
            &[("Tuesday", "morning"), ("tuesday ", "Evening"), ("friday", "afternoon")],
            &[("TUESDAY", "evening"), ("Friday", "afternoon"), ("monday", "morning")],
        ];
        entries
            .iter()
            .map(|slots| {
                let mut member = Member::blank(MemberId::new());
                member.intake_complete = true;
                member.affiliation = Some(Self::STATE_UNIVERSITY.to_string());
                member.availability = slots.iter().map(|(d, s)| (d.to_string(), s.to_string())).collect();
                member
            })
            .collect()
    }

    /// Varied profiles for property tests
    pub fn assorted_members() -> Vec<Member> {
        let styles = ["quiet", "with_music", "group_discussion", "teach_each_other"];
        let goals = ["ace_exams", "understand_concepts", "just_pass"];
        let levels = ["freshman", "sophomore", "junior", "senior", "graduate", "phd"];
        let topics = ["algorithms", "calculus", "databases", "statistics", "physics", "compilers"];
        let days = ["monday", "tuesday", "wednesday", "thursday"];
        let slots = ["morning", "afternoon", "evening"];

        (0..12usize)
            .map(|i| {
                let mut member = Member::blank(MemberId::new());
                member.intake_complete = true;
                member.affiliation = Some(if i % 3 == 0 {
                    Self::TECH_INSTITUTE.to_string()
                } else {
                    Self::STATE_UNIVERSITY.to_string()
                });
                member.topics = (0..(i % 4))
                    .map(|k| topics[(i + k * 2) % topics.len()].to_string())
                    .collect();
                if i % 5 != 0 {
                    member.availability = (0..(i % 3 + 1))
                        .map(|k| (days[(i + k) % days.len()].to_string(), slots[(i * k) % slots.len()].to_string()))
                        .collect();
                }
                member.interaction_style = (i % 6 != 0).then(|| styles[i % styles.len()].to_string());
                member.goal = (i % 7 != 0).then(|| goals[i % goals.len()].to_string());
                member.seniority = (i % 4 != 0).then(|| levels[i % levels.len()].to_string());
                member
            })
            .collect()
    }
}
