//! Cycle runner that persists the in-memory store after every cycle

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use matcher::services::InMemoryStore;
use matcher::{CycleOrchestrator, MatcherResult};
use shared::{logging, CycleSummary, ProcessId};

use crate::traits::CycleRunner;

pub struct SnapshotCycleRunner {
    orchestrator: CycleOrchestrator,
    store: Arc<InMemoryStore>,
    path: PathBuf,
}

impl SnapshotCycleRunner {
    pub fn new(orchestrator: CycleOrchestrator, store: Arc<InMemoryStore>, path: PathBuf) -> Self {
        Self {
            orchestrator,
            store,
            path,
        }
    }
}

#[async_trait]
impl CycleRunner for SnapshotCycleRunner {
    /// A failed save does not undo the cycle; it is reported with the
    /// per-pair errors.
    async fn run_cycle(&self) -> MatcherResult<CycleSummary> {
        let mut summary = self.orchestrator.run_cycle().await?;
        if let Err(e) = self.store.save(&self.path).await {
            logging::log_error(ProcessId::current(), "Snapshot save", &e);
            summary.errors.push(format!("snapshot not saved: {}", e));
        }
        Ok(summary)
    }
}
