//! WebServer entry point
//!
//! Loads the snapshot, wires a cycle orchestrator and serves `POST /cycle`.

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

use matcher::{build_orchestrator, cli::CycleArgs, services::InMemoryStore, services::RealApiKeySource, Stores};
use shared::{logging, process_info, ProcessId};
use webserver::{AppState, SnapshotCycleRunner, WebServer};

/// HTTP trigger for the study-partner matching cycle
#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "Serves POST /cycle in front of the matcher")]
struct Args {
    #[command(flatten)]
    cycle: CycleArgs,

    /// Port for HTTP server
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bearer token required on POST /cycle (open when unset)
    #[arg(long, env = "CYCLE_TRIGGER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    ProcessId::init_webserver();
    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(ProcessId::current(), "webserver");

    let bind_address: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;

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

    if args.token.is_none() {
        process_info!(ProcessId::current(), "🔓 No trigger token configured; POST /cycle is open");
    }

    let runner = SnapshotCycleRunner::new(orchestrator, store, args.cycle.data.clone());
    let state = AppState::new(Arc::new(runner), args.token);
    WebServer::new(state, bind_address).run().await?;

    logging::log_success(ProcessId::current(), "WebServer stopped gracefully");
    Ok(())
}
