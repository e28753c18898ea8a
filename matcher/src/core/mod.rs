//! Core business logic modules
//!
//! Pure scoring and assignment logic. The only I/O reached from here is the
//! lazily queried existing-pairing lookup the assigner receives by reference.

pub mod assigner;
pub mod eligibility;
pub mod normalize;
pub mod scorer;
pub mod state;

pub use assigner::{Assignment, MatchAssigner};
pub use eligibility::EligibilityGate;
pub use scorer::CompatibilityScorer;
pub use state::{CyclePhase, CycleState};
