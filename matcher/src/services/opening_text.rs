//! Opening-text strategies
//!
//! `ExternalGeneration` asks an OpenAI-compatible chat completions endpoint
//! for a one-line icebreaker. `DeterministicTemplate` never fails and is both
//! the fallback for every generation failure and the primary strategy when no
//! credentials are configured.

use std::sync::Arc;
use std::time::Duration;

use shared::{process_info, Member, MatcherConfig, ProcessId};

use crate::traits::{ApiKeySource, OpeningTextStrategy};
use crate::types::{GenerationFailure, OpenerContext, OpeningText};

/// Used when the two members share no topic
pub const GENERIC_OPENER: &str =
    "Hi! We've been matched as study partners. What are you working on this week?";

/// Template text, chosen only from shared topics
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicTemplate;

impl DeterministicTemplate {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, context: &OpenerContext) -> OpeningText {
        let text = match context.shared_topics.first() {
            Some(topic) => format!("Study {} together?", topic),
            None => GENERIC_OPENER.to_string(),
        };
        OpeningText {
            text,
            suggestion_id: None,
        }
    }
}

#[async_trait::async_trait]
impl OpeningTextStrategy for DeterministicTemplate {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, context: &OpenerContext) -> Result<OpeningText, GenerationFailure> {
        Ok(self.render(context))
    }
}

/// Chat-completions backed generation
pub struct ExternalGeneration {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ExternalGeneration {
    /// `timeout` bounds the HTTP request itself; the icebreaker applies its
    /// own outer timeout as well.
    pub fn new(api_key: String, endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    fn summarize(member: &Member) -> String {
        let mut parts = vec![member.label()];
        if !member.topics.is_empty() {
            parts.push(format!("studies {}", member.topics.join(", ")));
        }
        if let Some(style) = &member.interaction_style {
            parts.push(format!("prefers {} sessions", style));
        }
        if let Some(goal) = &member.goal {
            parts.push(format!("goal: {}", goal));
        }
        if let Some(seniority) = &member.seniority {
            parts.push(format!("level: {}", seniority));
        }
        parts.join("; ")
    }

    pub fn prompt(context: &OpenerContext) -> String {
        let shared = if context.shared_topics.is_empty() {
            "none".to_string()
        } else {
            context.shared_topics.join(", ")
        };
        format!(
            "Two students were just paired as study partners.\n\
             Student A: {}\n\
             Student B: {}\n\
             Shared topics: {}\n\
             Write one short, friendly opening message (at most two sentences) \
             that Student A could send to start studying together. \
             Reply with the message only.",
            Self::summarize(&context.member_a),
            Self::summarize(&context.member_b),
            shared
        )
    }
}

#[async_trait::async_trait]
impl OpeningTextStrategy for ExternalGeneration {
    fn name(&self) -> &'static str {
        "external"
    }

    async fn generate(&self, context: &OpenerContext) -> Result<OpeningText, GenerationFailure> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": Self::prompt(context)
                }
            ],
            "max_tokens": 80,
            "temperature": 0.7
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationFailure::Timeout
                } else {
                    GenerationFailure::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(GenerationFailure::Http(response.status().as_u16()));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationFailure::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| GenerationFailure::MalformedResponse("No content in response".to_string()))?;

        let suggestion_id = response_json
            .get("id")
            .and_then(|id| id.as_str())
            .map(str::to_string);

        Ok(OpeningText {
            text: content.trim_matches('"').to_string(),
            suggestion_id,
        })
    }
}

/// Pick the primary strategy by credential presence
pub async fn select_opening_strategy(
    keys: &dyn ApiKeySource,
    config: &MatcherConfig,
) -> Arc<dyn OpeningTextStrategy> {
    match keys.opener_api_key().await {
        Some(api_key) => {
            process_info!(
                ProcessId::current(),
                "🤖 Opening messages via {} ({})",
                config.opener_model,
                config.opener_endpoint
            );
            Arc::new(ExternalGeneration::new(
                api_key,
                config.opener_endpoint.clone(),
                config.opener_model.clone(),
                config.opener_timeout,
            ))
        }
        None => {
            process_info!(ProcessId::current(), "📝 No opener credentials; using template openers");
            Arc::new(DeterministicTemplate::new())
        }
    }
}
