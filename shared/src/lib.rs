//! Shared types for the study-partner matching system
//!
//! Contains the domain model (members, pairings and their derived artifacts),
//! identifiers, configuration and logging used by both the matcher library
//! and the HTTP trigger host.

pub mod config;
pub mod errors;
pub mod logging;
pub mod messages;
pub mod process;
pub mod types;

pub use config::MatcherConfig;
pub use errors::*;
pub use messages::{CycleResponse, CycleSummary, Notification};
pub use process::ProcessId;
pub use types::*;
