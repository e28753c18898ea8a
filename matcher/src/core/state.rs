//! Cycle state machine
//!
//! `Fetching -> Assigning -> Persisting -> Notifying -> Done`, with
//! `FatalError` reachable only from `Fetching` (and lock acquisition, which
//! precedes it). Once assignment begins the cycle always reaches `Done`.

use chrono::{DateTime, Utc};
use shared::{process_debug, CycleSummary, ProcessId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Fetching,
    Assigning,
    Persisting { completed: usize, total: usize },
    Notifying,
    Done,
    FatalError,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyclePhase::Idle => write!(f, "idle"),
            CyclePhase::Fetching => write!(f, "fetching"),
            CyclePhase::Assigning => write!(f, "assigning"),
            CyclePhase::Persisting { completed, total } => write!(f, "persisting ({completed}/{total})"),
            CyclePhase::Notifying => write!(f, "notifying"),
            CyclePhase::Done => write!(f, "done"),
            CyclePhase::FatalError => write!(f, "fatal error"),
        }
    }
}

/// Mutable bookkeeping for a single cycle run
#[derive(Debug)]
pub struct CycleState {
    phase: CyclePhase,
    started_at: DateTime<Utc>,
    summary: CycleSummary,
}

impl CycleState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            phase: CyclePhase::Idle,
            started_at,
            summary: CycleSummary::default(),
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn transition(&mut self, next: CyclePhase) {
        process_debug!(ProcessId::current(), "Cycle phase {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Advance the persisting counter, if in that phase
    pub fn pair_finished(&mut self) {
        if let CyclePhase::Persisting { completed, total } = self.phase {
            self.phase = CyclePhase::Persisting {
                completed: completed + 1,
                total,
            };
        }
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.summary.errors.push(error.into());
    }

    pub fn summary_mut(&mut self) -> &mut CycleSummary {
        &mut self.summary
    }

    pub fn finish(mut self) -> CycleSummary {
        self.transition(CyclePhase::Done);
        self.summary
    }
}
