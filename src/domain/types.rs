//! # Inbound Update Model
//!
//! Typed representation of the events the polling transport delivers:
//! plain text messages and button-press callbacks. Raw wire payloads are
//! translated here, once, at the system boundary; anything malformed is
//! dropped by the caller with a log instead of crashing the loop.

use serde::Serialize;
use serde_json::Value;

use crate::domain::callback::CallbackAction;

/// Numeric actor identifier used across storage, callbacks and commands.
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
}

/// The actor behind an update, with whatever identity metadata the
/// transport attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Sender {
    pub id: UserId,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub language_code: Option<String>,
}

impl Sender {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            username: None,
            full_name: None,
            language_code: None,
        }
    }

    /// Best display name available: full name, then username, then the id.
    pub fn display_name(&self) -> String {
        self.full_name
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub id: String,
    pub chat_id: String,
    pub chat_kind: ChatKind,
    pub sender: Sender,
    pub text: Option<String>,
}

impl IncomingMessage {
    /// Command name (lowercased, without the leading slash) when the
    /// message text is a `/command`.
    pub fn command(&self) -> Option<String> {
        let text = self.text.as_deref()?;
        let stripped = text.strip_prefix('/')?;
        let name = stripped.split_whitespace().next()?;
        Some(name.to_lowercase())
    }

    /// Whitespace-separated arguments following a `/command`.
    pub fn args(&self) -> Vec<&str> {
        match self.text.as_deref() {
            Some(text) if text.starts_with('/') => text.split_whitespace().skip(1).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallbackPress {
    pub id: String,
    pub chat_id: String,
    pub chat_kind: ChatKind,
    /// The message carrying the keypad that was pressed.
    pub message_id: String,
    pub sender: Sender,
    /// Decoded once at the parse boundary; undecodable payloads become
    /// [`CallbackAction::Malformed`].
    pub action: CallbackAction,
    pub raw: String,
}

/// One inbound event. Exactly one variant per update.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Message(IncomingMessage),
    CallbackPress(CallbackPress),
}

impl Update {
    pub fn message(&self) -> Option<&IncomingMessage> {
        match self {
            Update::Message(message) => Some(message),
            Update::CallbackPress(_) => None,
        }
    }

    pub fn callback(&self) -> Option<&CallbackPress> {
        match self {
            Update::CallbackPress(press) => Some(press),
            Update::Message(_) => None,
        }
    }

    pub fn chat_id(&self) -> &str {
        match self {
            Update::Message(message) => &message.chat_id,
            Update::CallbackPress(press) => &press.chat_id,
        }
    }

    pub fn chat_kind(&self) -> ChatKind {
        match self {
            Update::Message(message) => message.chat_kind,
            Update::CallbackPress(press) => press.chat_kind,
        }
    }

    pub fn sender(&self) -> &Sender {
        match self {
            Update::Message(message) => &message.sender,
            Update::CallbackPress(press) => &press.sender,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.message().and_then(|message| message.text.as_deref())
    }
}

/// Inline keypad wire shape (`rows` of `buttons`) accepted by the bot API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Keypad {
    pub rows: Vec<KeypadRow>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeypadRow {
    pub buttons: Vec<KeypadButton>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeypadButton {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub button_text: String,
}

impl KeypadButton {
    pub fn simple(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            id: callback_data.into(),
            kind: "Simple".to_string(),
            button_text: text.into(),
        }
    }
}

impl Keypad {
    pub fn from_rows(rows: Vec<Vec<KeypadButton>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|buttons| KeypadRow { buttons })
                .collect(),
        }
    }
}

fn chat_kind_of(chat_id: &str) -> ChatKind {
    if chat_id.starts_with('g') {
        ChatKind::Group
    } else {
        ChatKind::Private
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn user_id_field(value: &Value, key: &str) -> Option<UserId> {
    match value.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn sender_from(value: &Value) -> Option<Sender> {
    let id = user_id_field(value, "sender_id")?;
    let mut sender = Sender::new(id);
    sender.username = string_field(value, "sender_username");
    sender.full_name = string_field(value, "sender_name");
    sender.language_code = string_field(value, "sender_language");
    Some(sender)
}

/// Translate one raw transport payload into an [`Update`].
///
/// A `new_message` entry is a text message, unless its
/// `aux_data.button_id` is set, in which case it is the callback press
/// for the keypad attached to that message. Returns `None` for anything
/// unrecognized; the poller logs and drops those.
pub fn parse_update(payload: &Value) -> Option<Update> {
    let update = payload.get("update").unwrap_or(payload);
    let message_payload = update.get("new_message")?;

    let chat_id = string_field(update, "chat_id")?;
    let chat_kind = chat_kind_of(&chat_id);
    let message_id = string_field(message_payload, "message_id")?;
    let sender = sender_from(message_payload)?;
    let text = string_field(message_payload, "text");

    let button_id = message_payload
        .get("aux_data")
        .and_then(|aux| aux.get("button_id"))
        .and_then(Value::as_str);

    if let Some(data) = button_id {
        return Some(Update::CallbackPress(CallbackPress {
            id: message_id.clone(),
            chat_id,
            chat_kind,
            message_id,
            sender,
            action: CallbackAction::decode(data),
            raw: data.to_string(),
        }));
    }

    Some(Update::Message(IncomingMessage {
        id: message_id,
        chat_id,
        chat_kind,
        sender,
        text,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_private_text_message() {
        let payload = json!({
            "update": {
                "chat_id": "b123",
                "new_message": {
                    "message_id": "m1",
                    "sender_id": 42,
                    "text": "hello",
                }
            }
        });
        let update = parse_update(&payload).expect("message should parse");
        let message = update.message().expect("expected message variant");
        assert_eq!(message.chat_kind, ChatKind::Private);
        assert_eq!(message.sender.id, 42);
        assert_eq!(message.text.as_deref(), Some("hello"));
    }

    #[test]
    fn parses_group_chat_kind_from_prefix() {
        let payload = json!({
            "chat_id": "g900",
            "new_message": { "message_id": "m2", "sender_id": "7", "text": "hi" }
        });
        let update = parse_update(&payload).expect("message should parse");
        assert_eq!(update.chat_kind(), ChatKind::Group);
    }

    #[test]
    fn button_press_becomes_callback() {
        let payload = json!({
            "update": {
                "chat_id": "b123",
                "new_message": {
                    "message_id": "m3",
                    "sender_id": 42,
                    "aux_data": { "button_id": "apply_for_guild" }
                }
            }
        });
        let update = parse_update(&payload).expect("press should parse");
        let press = update.callback().expect("expected callback variant");
        assert_eq!(press.action, CallbackAction::Apply);
        assert_eq!(press.message_id, "m3");
    }

    #[test]
    fn malformed_payload_is_dropped() {
        assert!(parse_update(&json!({ "unrelated": true })).is_none());
        assert!(parse_update(&json!({ "chat_id": "b1", "new_message": {} })).is_none());
    }

    #[test]
    fn command_parsing() {
        let message = IncomingMessage {
            id: "m".into(),
            chat_id: "b1".into(),
            chat_kind: ChatKind::Private,
            sender: Sender::new(1),
            text: Some("/Promote 99".into()),
        };
        assert_eq!(message.command().as_deref(), Some("promote"));
        assert_eq!(message.args(), vec!["99"]);
    }
}
