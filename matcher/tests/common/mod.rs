//! Common test utilities and infrastructure
//!
//! Shared fixtures and helpers used across the matcher integration suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{BlindPairings, CycleBuilder, FailingChannels, RecordingNotifier};
