//! Environment-backed credential lookup
//!
//! Keys are read from a `.env` file (current or parent directories) and then
//! from the process environment; the environment wins. The opener key is
//! optional: when it is absent, openers come from the template.

use crate::traits::ApiKeySource;

pub const OPENER_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Real API key source using environment variables
pub struct RealApiKeySource {
    variable: String,
}

impl RealApiKeySource {
    pub fn new() -> Self {
        Self::with_variable(OPENER_API_KEY_VAR)
    }

    /// Read the key from a different variable
    pub fn with_variable(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    fn init_env() {
        // Silently ignored when no .env file exists
        let _ = dotenv::dotenv();
    }
}

impl Default for RealApiKeySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ApiKeySource for RealApiKeySource {
    async fn opener_api_key(&self) -> Option<String> {
        Self::init_env();
        std::env::var(&self.variable)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}
