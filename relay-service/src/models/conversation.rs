//! Conversation shapes exchanged with the website and the completion API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a turn as the website records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Ai,
}

/// One message exchanged between a visitor and the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub author: Author,
    pub text: String,
}

impl ConversationTurn {
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            author: Author::Ai,
            text: text.into(),
        }
    }
}

/// Role tag understood by the completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Wire shape of a single completion API message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Convert caller-supplied history into completion API messages.
///
/// Anything that is not a JSON array yields no messages. Entries without a
/// non-empty string `text` or without an `author` are skipped; `"user"` maps
/// to [`Role::User`] and every other author to [`Role::Assistant`]. Order is
/// preserved.
pub fn normalize_history(history: &Value) -> Vec<ChatMessage> {
    let Some(entries) = history.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let text = entry.get("text")?.as_str().filter(|t| !t.is_empty())?;
            let author = entry.get("author").filter(|a| !a.is_null())?;
            let role = match author.as_str() {
                Some("user") => Role::User,
                _ => Role::Assistant,
            };
            Some(ChatMessage {
                role,
                content: text.to_string(),
            })
        })
        .collect()
}

/// Return a new history equal to `history` with `turn` appended.
///
/// A non-array history is treated as empty. The input value is left intact.
pub fn append_turn(history: &Value, turn: &ConversationTurn) -> Value {
    let mut entries = history.as_array().cloned().unwrap_or_default();
    entries.push(serde_json::json!({
        "author": turn.author,
        "text": turn.text,
    }));
    Value::Array(entries)
}
