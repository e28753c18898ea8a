//! Service-specific tests
//!
//! Each service has its own test file with dedicated fixtures and helpers.


// Common test utilities for services
#[cfg(test)]
pub mod common {
    use shared::{Member, MemberId};

    /// Member with intake complete and the given affiliation and topics
    pub fn member(affiliation: &str, topics: &[&str]) -> Member {
        let mut member = Member::blank(MemberId::new());
        member.intake_complete = true;
        member.affiliation = Some(affiliation.to_string());
        member.topics = topics.iter().map(|t| t.to_string()).collect();
        member
    }
}
