//! Process identity used to tag every log line

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Process identifier for any binary in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// Cycle runner (one-shot or scheduled)
    Matcher,
    /// HTTP trigger host
    WebServer,
}

impl ProcessId {
    /// Initialize the global process ID for the matcher binary
    pub fn init_matcher() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Matcher)
    }

    /// Initialize the global process ID for the webserver binary
    pub fn init_webserver() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::WebServer)
    }

    /// Get the global process ID.
    ///
    /// Library code and tests that never called an `init_*` function are
    /// attributed to the matcher.
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Matcher)
    }

    /// Crate targets this process logs under, used to build the env filter
    pub fn log_targets(&self) -> &'static [&'static str] {
        match self {
            ProcessId::Matcher => &["matcher", "shared"],
            ProcessId::WebServer => &["webserver", "matcher", "shared"],
        }
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Matcher => write!(f, "matcher"),
            ProcessId::WebServer => write!(f, "webserver"),
        }
    }
}
