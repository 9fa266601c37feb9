//! # Domain Traits
//!
//! Abstract interface for the chat transport. Allows for pluggable
//! implementations in the Infrastructure layer and in-memory doubles in
//! tests.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::types::Keypad;

/// Abstract interface for the chat platform transport.
///
/// `fetch` drives the polling loop with an opaque cursor; the remaining
/// operations are the full outbound surface the core needs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the next batch of raw update payloads. Returns the payloads
    /// in delivery order plus the next cursor, if the transport advanced.
    async fn fetch(&self, cursor: Option<&str>) -> Result<(Vec<Value>, Option<String>)>;

    /// Send a message, optionally with an inline keypad. Returns the new
    /// message id when the transport reports one.
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keypad: Option<Keypad>,
    ) -> Result<Option<String>>;

    /// Edit a previously sent message in place.
    async fn edit_message(
        &self,
        chat_id: &str,
        message_id: &str,
        text: &str,
        keypad: Option<Keypad>,
    ) -> Result<()>;

    /// Delete a message. Used by fire-and-forget cleanup tasks only.
    async fn delete_message(&self, chat_id: &str, message_id: &str) -> Result<()>;
}
