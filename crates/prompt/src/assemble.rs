//! Prompt assembly — the ordered message list for a chat-completion call.
//!
//! The prompt order is fixed and non-configurable:
//!
//! 1. system prompt (card's own, or the configured default)
//! 2. bot description
//! 3. bot personality
//! 4. parsed example-dialogue turns
//! 5. `"[Start a new Chat]"` boundary marker
//! 6. first message (only when memory is disabled — with memory on, the
//!    greeting already lives in the stored history)
//! 7. persona substitution over everything built so far
//! 8. stored history (memory enabled, chronological order)
//! 9. the new user utterance
//! 10. post-history instructions, substituted, appended last so they have
//!     maximal influence on the next generation
//!
//! Stages 1–4, 6, and 8–10 are skipped when their source data is empty;
//! the boundary marker always appears. Without a bot card the engine
//! degrades to a minimal prompt (stored system prompt + history + new
//! utterance) and never fails.
//!
//! # Determinism
//!
//! Assembly is a pure transform: identical inputs always produce the
//! identical message list and size estimate.

use tavernkit_config::AppConfig;
use tavernkit_core::card::CharacterCard;
use tavernkit_core::message::{PromptMessage, Role};
use tracing::debug;

use crate::budget::{approx_tokens, estimate_content_bytes};
use crate::dialogue::parse_example_dialogue;
use crate::substitute::Replacements;

/// Fixed system marker announcing a fresh conversation boundary.
pub const CHAT_BOUNDARY_MARKER: &str = "[Start a new Chat]";

/// Assembly defaults, passed in explicitly (no global default-card
/// state) and typically built from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AssemblerDefaults {
    /// Used when a card carries no system prompt of its own
    pub system_prompt: String,

    /// Used when a card carries no name
    pub bot_name: String,

    /// Empirical ratio for the logged token approximation
    pub bytes_per_token: f32,
}

impl Default for AssemblerDefaults {
    fn default() -> Self {
        Self {
            system_prompt: concat!(
                "Write {{char}}'s next reply in a fictional chat between {{char}} ",
                "and {{user}}. Write 1 reply only, stay in character, and avoid ",
                "repetition.",
            )
            .into(),
            bot_name: "Assistant".into(),
            bytes_per_token: 3.6,
        }
    }
}

impl From<&AppConfig> for AssemblerDefaults {
    fn from(config: &AppConfig) -> Self {
        Self {
            system_prompt: config.default_system_prompt.clone(),
            bot_name: config.fallback_bot_name.clone(),
            bytes_per_token: config.bytes_per_token,
        }
    }
}

/// The new utterance for the current turn.
#[derive(Debug, Clone, Copy)]
pub struct NewMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

impl<'a> NewMessage<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }
}

/// All inputs for one assembly pass.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    /// The active bot persona, if the conversation has one
    pub bot_card: Option<&'a CharacterCard>,

    /// Stored system prompt for the card-less fallback path
    pub stored_prompt: Option<&'a str>,

    /// Display name of the human participant
    pub user_name: &'a str,

    /// Stored chronological history
    pub history: &'a [PromptMessage],

    /// Whether history is replayed (and the greeting suppressed)
    pub memory_enabled: bool,

    /// The utterance that triggered this turn, if any
    pub new_message: Option<NewMessage<'a>>,
}

/// The assembled prompt.
#[derive(Debug, Clone)]
pub struct AssemblyOutput {
    /// The full ordered message list for the request
    pub messages: Vec<PromptMessage>,

    /// Only the messages introduced by this turn (the caller appends the
    /// assistant reply afterwards)
    pub new_messages: Vec<PromptMessage>,

    /// Content bytes of `messages` (budget estimator, `content` only)
    pub estimated_bytes: usize,
}

/// The prompt assembly engine. Stateless — create one and reuse it.
pub struct PromptAssembler {
    defaults: AssemblerDefaults,
}

impl PromptAssembler {
    pub fn new(defaults: AssemblerDefaults) -> Self {
        Self { defaults }
    }

    /// Assemble the ordered message list for one turn.
    pub fn assemble(&self, input: &AssemblyInput<'_>) -> AssemblyOutput {
        let Some(card) = input.bot_card else {
            debug!("no bot card for conversation, using minimal prompt");
            return self.assemble_fallback(input);
        };

        let data = &card.data;
        let bot_name = if data.name.is_empty() {
            self.defaults.bot_name.as_str()
        } else {
            data.name.as_str()
        };
        let system_prompt = if data.system_prompt.is_empty() {
            self.defaults.system_prompt.as_str()
        } else {
            data.system_prompt.as_str()
        };

        let mut messages = Vec::new();

        if !system_prompt.is_empty() {
            messages.push(PromptMessage::system(system_prompt));
        }
        if !data.description.is_empty() {
            messages.push(PromptMessage::system(&data.description));
        }
        if !data.personality.is_empty() {
            messages.push(PromptMessage::system(&data.personality));
        }
        if !data.example_dialogue.is_empty() {
            messages.extend(
                parse_example_dialogue(&data.example_dialogue)
                    .into_iter()
                    .map(PromptMessage::from),
            );
        }

        messages.push(PromptMessage::system(CHAT_BOUNDARY_MARKER));

        // With memory on, the greeting was already delivered and stored;
        // repeating it here would duplicate it.
        if !input.memory_enabled && !data.first_message.is_empty() {
            messages.push(PromptMessage::assistant(bot_name, &data.first_message));
        }

        let replacements = Replacements::persona(input.user_name, bot_name);
        replacements.apply_messages(&mut messages);

        if input.memory_enabled && !input.history.is_empty() {
            messages.extend_from_slice(input.history);
        }

        let new_messages = self.push_new_message(&mut messages, input);

        if !data.post_history_instructions.is_empty() {
            messages.push(PromptMessage::system(
                replacements.apply_str(&data.post_history_instructions),
            ));
        }

        self.finish(messages, new_messages)
    }

    /// Minimal prompt for conversations without a bot card: optional
    /// stored system prompt, history, new utterance.
    fn assemble_fallback(&self, input: &AssemblyInput<'_>) -> AssemblyOutput {
        let mut messages = Vec::new();
        if let Some(prompt) = input.stored_prompt.filter(|p| !p.is_empty()) {
            messages.push(PromptMessage::system(prompt));
        }
        messages.extend_from_slice(input.history);
        let new_messages = self.push_new_message(&mut messages, input);
        self.finish(messages, new_messages)
    }

    fn push_new_message(
        &self,
        messages: &mut Vec<PromptMessage>,
        input: &AssemblyInput<'_>,
    ) -> Vec<PromptMessage> {
        let Some(new) = input.new_message.filter(|m| !m.content.is_empty()) else {
            return Vec::new();
        };
        let message = PromptMessage {
            name: (!input.user_name.is_empty()).then(|| input.user_name.to_string()),
            role: new.role,
            content: new.content.to_string(),
        };
        messages.push(message.clone());
        vec![message]
    }

    fn finish(
        &self,
        messages: Vec<PromptMessage>,
        new_messages: Vec<PromptMessage>,
    ) -> AssemblyOutput {
        let estimated_bytes = estimate_content_bytes(&messages);
        debug!(
            message_count = messages.len(),
            estimated_bytes,
            approx_tokens = approx_tokens(estimated_bytes, self.defaults.bytes_per_token),
            "assembled prompt"
        );
        AssemblyOutput {
            messages,
            new_messages,
            estimated_bytes,
        }
    }
}
