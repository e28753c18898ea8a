//! Opening message for a freshly persisted pairing
//!
//! The primary strategy runs under a timeout; any failure, including the
//! timeout, is answered by the deterministic template. Nothing in here can
//! fail the enclosing cycle: insert and flag errors are logged and the
//! generator reports `None` or the inserted message.

use std::sync::Arc;
use std::time::Duration;

use shared::{
    process_debug, process_info, process_warn, Channel, Member, NewMessage, OpeningMessage, Pairing, ProcessId,
};

use crate::core::normalize;
use crate::services::opening_text::DeterministicTemplate;
use crate::traits::{MessageStore, OpeningTextStrategy, PairingStore};
use crate::types::{GenerationFailure, OpenerContext, OpeningText};

pub struct IcebreakerGenerator {
    strategy: Arc<dyn OpeningTextStrategy>,
    fallback: DeterministicTemplate,
    timeout: Duration,
    messages: Arc<dyn MessageStore>,
    pairings: Arc<dyn PairingStore>,
}

impl IcebreakerGenerator {
    pub fn new(
        strategy: Arc<dyn OpeningTextStrategy>,
        timeout: Duration,
        messages: Arc<dyn MessageStore>,
        pairings: Arc<dyn PairingStore>,
    ) -> Self {
        Self {
            strategy,
            fallback: DeterministicTemplate::new(),
            timeout,
            messages,
            pairings,
        }
    }

    pub fn context(member_a: &Member, member_b: &Member) -> OpenerContext {
        OpenerContext {
            member_a: member_a.clone(),
            member_b: member_b.clone(),
            shared_topics: normalize::shared_topics(&member_a.topics, &member_b.topics),
        }
    }

    /// Text from the primary strategy, or the template on any failure
    pub async fn opening_text(&self, context: &OpenerContext) -> OpeningText {
        let outcome = match tokio::time::timeout(self.timeout, self.strategy.generate(context)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationFailure::Timeout),
        };

        match outcome {
            Ok(text) if !text.text.trim().is_empty() => text,
            Ok(_) => {
                process_warn!(
                    ProcessId::current(),
                    "⚠️ Opener strategy '{}' returned empty text; using template",
                    self.strategy.name()
                );
                self.fallback.render(context)
            }
            Err(failure) => {
                process_warn!(
                    ProcessId::current(),
                    "⚠️ Opener strategy '{}' failed ({}); using template",
                    self.strategy.name(),
                    failure
                );
                self.fallback.render(context)
            }
        }
    }

    /// Insert the opener into `channel` and flag the pairing as opened.
    ///
    /// Returns `None` when the pairing was already opened or the insert
    /// failed. The message is authored by `member_a`.
    pub async fn generate(
        &self,
        pairing: &Pairing,
        channel: &Channel,
        member_a: &Member,
        member_b: &Member,
    ) -> Option<OpeningMessage> {
        if pairing.opening_message_sent {
            process_debug!(ProcessId::current(), "Pairing {} already opened; skipping", pairing.id);
            return None;
        }

        let context = Self::context(member_a, member_b);
        let text = self.opening_text(&context).await;

        let message = match self
            .messages
            .create(NewMessage {
                channel_id: channel.id,
                author_id: member_a.id,
                content: text.text,
                is_generated: true,
                source_suggestion_id: text.suggestion_id,
            })
            .await
        {
            Ok(message) => message,
            Err(e) => {
                process_warn!(ProcessId::current(), "⚠️ Opening message insert failed for pairing {}: {}", pairing.id, e);
                return None;
            }
        };

        if let Err(e) = self.pairings.mark_opening_sent(&pairing.id).await {
            process_warn!(
                ProcessId::current(),
                "⚠️ Opening message stored but pairing {} not flagged: {}",
                pairing.id,
                e
            );
        } else {
            process_info!(ProcessId::current(), "💬 Opened pairing {}", pairing.id);
        }

        Some(message)
    }
}
