//! # Bot API Client
//!
//! Implements the [`Transport`] trait against a Rubika-style bot HTTP
//! API (`getUpdates` / `sendMessage` / `editMessageText` /
//! `deleteMessage`). This module is the only place that knows the wire
//! endpoints; everything above it talks through the trait.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::domain::traits::Transport;
use crate::domain::types::Keypad;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const FETCH_LIMIT: u32 = 25;

pub struct HttpBotApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBotApi {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: format!("{}/{}", api_url.trim_end_matches('/'), token),
        })
    }

    async fn call(&self, method: &str, payload: Value) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, method);
        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("{method} request failed"))?
            .error_for_status()
            .with_context(|| format!("{method} returned an error status"))?;
        response
            .json()
            .await
            .with_context(|| format!("{method} returned a non-JSON body"))
    }
}

#[async_trait]
impl Transport for HttpBotApi {
    async fn fetch(&self, cursor: Option<&str>) -> Result<(Vec<Value>, Option<String>)> {
        let mut payload = json!({ "limit": FETCH_LIMIT });
        if let Some(cursor) = cursor {
            payload["offset_id"] = Value::String(cursor.to_string());
        }
        let data = self.call("getUpdates", payload).await?;
        let updates = data
            .get("updates")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next_cursor = data
            .get("next_offset_id")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok((updates, next_cursor))
    }

    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keypad: Option<Keypad>,
    ) -> Result<Option<String>> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(keypad) = keypad {
            payload["inline_keypad"] = serde_json::to_value(keypad)?;
        }
        let data = self.call("sendMessage", payload).await?;
        Ok(data.get("message_id").and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }))
    }

    async fn edit_message(
        &self,
        chat_id: &str,
        message_id: &str,
        text: &str,
        keypad: Option<Keypad>,
    ) -> Result<()> {
        let mut payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        if let Some(keypad) = keypad {
            payload["inline_keypad"] = serde_json::to_value(keypad)?;
        }
        self.call("editMessageText", payload).await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: &str, message_id: &str) -> Result<()> {
        self.call(
            "deleteMessage",
            json!({ "chat_id": chat_id, "message_id": message_id }),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::types::{Keypad, KeypadButton};

    #[test]
    fn keypad_serializes_to_wire_shape() {
        let keypad = Keypad::from_rows(vec![vec![KeypadButton::simple("Apply", "apply_for_guild")]]);
        let value = serde_json::to_value(keypad).expect("keypad serializes");
        assert_eq!(
            value,
            serde_json::json!({
                "rows": [{ "buttons": [{
                    "id": "apply_for_guild",
                    "type": "Simple",
                    "button_text": "Apply"
                }]}]
            })
        );
    }
}
