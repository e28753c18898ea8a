//! Main entry point for the matcher binary
//!
//! Runs one matching cycle against a JSON snapshot, or a fixed-interval
//! schedule of cycles, saving the snapshot after each one.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use matcher::{
    build_orchestrator, cli::CycleArgs, services::InMemoryStore, services::RealApiKeySource, CycleOrchestrator,
    Stores,
};
use shared::{logging, process_debug, process_info, ProcessId};

/// Periodically pairs eligible members into study partnerships
#[derive(Parser)]
#[command(name = "matcher")]
#[command(about = "Runs the study-partner auto-matching cycle")]
pub struct Args {
    #[command(flatten)]
    pub cycle: CycleArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Run a cycle every N seconds instead of once
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Stop after this many scheduled cycles (runs until Ctrl+C if not specified)
    #[arg(long)]
    pub iterations: Option<u32>,
}

async fn run_and_save(orchestrator: &CycleOrchestrator, store: &InMemoryStore, args: &Args) -> anyhow::Result<()> {
    let summary = orchestrator.run_cycle().await.context("matching cycle failed")?;
    for error in &summary.errors {
        process_debug!(ProcessId::current(), "Cycle error: {}", error);
    }
    store
        .save(&args.cycle.data)
        .await
        .with_context(|| format!("failed to save snapshot {}", args.cycle.data.display()))?;
    process_info!(
        ProcessId::current(),
        "💾 Saved snapshot ({} new matches)",
        summary.matches_created
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    ProcessId::init_matcher();
    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(ProcessId::current(), "matcher");

    let store = Arc::new(
        InMemoryStore::load(&args.cycle.data)
            .await
            .with_context(|| format!("failed to load snapshot {}", args.cycle.data.display()))?,
    );
    let config = args.cycle.to_config().context("invalid matcher configuration")?;
    let orchestrator = build_orchestrator(
        config,
        Stores::from_shared(store.clone()),
        &RealApiKeySource::new(),
    )
    .await
    .context("invalid matcher configuration")?;

    let Some(interval_secs) = args.interval_secs else {
        run_and_save(&orchestrator, &store, &args).await?;
        logging::log_success(ProcessId::current(), "Matcher finished");
        return Ok(());
    };

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    let mut completed = 0u32;
    process_info!(ProcessId::current(), "⏱️ Running a cycle every {}s", interval_secs.max(1));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_and_save(&orchestrator, &store, &args).await {
                    logging::log_error(ProcessId::current(), "Scheduled cycle", &format!("{:#}", e));
                }
                completed += 1;
                if args.iterations.is_some_and(|limit| completed >= limit) {
                    break;
                }
            }
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal"),
                    Err(err) => logging::log_error(ProcessId::current(), "Signal handling", &err),
                }
                break;
            }
        }
    }

    logging::log_success(ProcessId::current(), "Matcher stopped gracefully");
    Ok(())
}
