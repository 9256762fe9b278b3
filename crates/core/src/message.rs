//! Message domain types.
//!
//! `PromptMessage` is the wire-level unit sent to a chat-completion
//! endpoint; `ConversationTurn` is the structured form produced by the
//! dialogue-example parser. Both are ordered, chronological sequences
//! wherever they appear.

use serde::{Deserialize, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (persona, rules, steering)
    System,
    /// The end user
    User,
    /// The AI character
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in chat-completion wire format.
///
/// `name` carries the speaker for user/assistant messages when one is
/// known; system messages usually omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Speaker name, when attributed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,
}

impl PromptMessage {
    /// Create a system message (no speaker name).
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            name: None,
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message attributed to a speaker.
    pub fn user(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message attributed to a speaker.
    pub fn assistant(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A structured turn parsed from a card's example dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// The raw speaker marker as written in the source (e.g. `{{user}}`)
    pub speaker_name: String,

    /// Role derived from the marker
    pub role: Role,

    /// Accumulated turn text (may span multiple lines)
    pub content: String,
}

impl From<ConversationTurn> for PromptMessage {
    fn from(turn: ConversationTurn) -> Self {
        Self {
            name: Some(turn.speaker_name),
            role: turn.role,
            content: turn.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
    }

    #[test]
    fn system_message_omits_name_on_wire() {
        let msg = PromptMessage::system("[Start a new Chat]");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("name"));
        assert!(json.contains("[Start a new Chat]"));
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = PromptMessage::user("Alice", "Hello there");
        let json = serde_json::to_string(&msg).unwrap();
        let back: PromptMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn turn_converts_to_message() {
        let turn = ConversationTurn {
            speaker_name: "{{char}}".into(),
            role: Role::Assistant,
            content: "Hello".into(),
        };
        let msg: PromptMessage = turn.into();
        assert_eq!(msg.name.as_deref(), Some("{{char}}"));
        assert_eq!(msg.role, Role::Assistant);
    }
}
