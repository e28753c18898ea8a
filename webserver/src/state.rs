//! Shared state handed to every request handler

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::traits::CycleRunner;

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<dyn CycleRunner>,
    /// Expected bearer token; `None` disables the check
    pub token: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(runner: Arc<dyn CycleRunner>, token: Option<String>) -> Self {
        Self {
            runner,
            token: token.filter(|t| !t.trim().is_empty()),
            started_at: Utc::now(),
        }
    }

    /// Check an `Authorization` header value against the configured token
    pub fn authorize(&self, header: Option<&str>) -> bool {
        let Some(expected) = &self.token else {
            return true;
        };
        header
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|presented| presented.trim() == expected)
    }
}
