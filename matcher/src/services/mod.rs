//! Service implementations
//!
//! Real implementations of the seam traits: the snapshot-backed store, the
//! opening-text strategies, notifiers and the credential source.

pub mod api_keys;
pub mod memory_store;
pub mod notifier;
pub mod opening_text;

#[cfg(test)]
mod tests;

pub use api_keys::RealApiKeySource;
pub use memory_store::{InMemoryStore, StoreSnapshot};
pub use notifier::{LogNotifier, WebhookNotifier};
pub use opening_text::{select_opening_strategy, DeterministicTemplate, ExternalGeneration};
