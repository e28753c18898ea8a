//! Service trait definitions for dependency injection

use async_trait::async_trait;

use matcher::{CycleOrchestrator, MatcherResult};
use shared::CycleSummary;

/// Whatever actually runs a matching cycle when `POST /cycle` arrives
#[mockall::automock]
#[async_trait]
pub trait CycleRunner: Send + Sync {
    /// `Err` only for fatal cycle failures
    async fn run_cycle(&self) -> MatcherResult<CycleSummary>;
}

#[async_trait]
impl CycleRunner for CycleOrchestrator {
    async fn run_cycle(&self) -> MatcherResult<CycleSummary> {
        CycleOrchestrator::run_cycle(self).await
    }
}
