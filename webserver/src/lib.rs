//! HTTP trigger host for the matching cycle
//!
//! Exposes `POST /cycle` (bearer-token protected) and `GET /health` in front
//! of a `CycleRunner`, normally a matcher `CycleOrchestrator` that saves its
//! snapshot after every run.

pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use services::SnapshotCycleRunner;
pub use state::AppState;
pub use traits::CycleRunner;
pub use webserver_impl::WebServer;
