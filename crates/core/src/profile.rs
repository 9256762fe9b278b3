//! Chat profile — per-conversation state.
//!
//! A profile binds a conversation to its bot card, optional user persona
//! card, memory settings, and the rolling message history that gets
//! replayed into the prompt when memory is enabled.

use crate::message::PromptMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of history messages retained per conversation.
pub const DEFAULT_MEMORY_DEPTH: usize = 100;

/// Per-conversation chat state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatProfile {
    /// Opaque conversation identifier (channel id, DM id, ...)
    pub chat_id: String,

    /// Display name of the human participant
    pub user_name: String,

    /// Card id of the bot persona, if one is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id_bot: Option<String>,

    /// Card id of the user persona, if one is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id_user: Option<String>,

    /// Stored system prompt for card-less conversations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Whether history is replayed into the prompt
    #[serde(default)]
    pub memory_enabled: bool,

    /// Maximum retained history messages
    #[serde(default = "default_memory_depth")]
    pub memory_depth: usize,

    /// Rolling chronological history
    #[serde(default)]
    pub messages: Vec<PromptMessage>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_memory_depth() -> usize {
    DEFAULT_MEMORY_DEPTH
}

impl ChatProfile {
    /// Create a fresh profile for a conversation.
    pub fn new(chat_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            chat_id: chat_id.into(),
            user_name: user_name.into(),
            card_id_bot: None,
            card_id_user: None,
            prompt: None,
            memory_enabled: false,
            memory_depth: DEFAULT_MEMORY_DEPTH,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append messages to the history, trimming the oldest entries when
    /// the memory depth is exceeded.
    pub fn push_messages(&mut self, messages: impl IntoIterator<Item = PromptMessage>) {
        self.messages.extend(messages);
        if self.messages.len() > self.memory_depth {
            let excess = self.messages.len() - self.memory_depth;
            self.messages.drain(..excess);
        }
        self.updated_at = Utc::now();
    }

    /// Remove and return the most recent history message.
    pub fn pop_message(&mut self) -> Option<PromptMessage> {
        let popped = self.messages.pop();
        if popped.is_some() {
            self.updated_at = Utc::now();
        }
        popped
    }

    /// Clear the entire history.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.updated_at = Utc::now();
    }
}
