//! # TavernKit Core
//!
//! Domain types, traits, and error definitions for TavernKit — a character
//! card codec and prompt assembly toolkit for LLM role-play chat bots.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! External collaborators (document store, chat-completion backend) are
//! defined as traits here. Implementations live in their respective crates.
//! This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod backend;
pub mod card;
pub mod error;
pub mod message;
pub mod profile;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use backend::{ChatBackend, ChatRequest, ChatResponse, Usage};
pub use card::{CardData, CharacterCard, CARD_SPEC, CARD_SPEC_VERSION};
pub use error::{BackendError, CardError, Error, PngError, Result, StoreError};
pub use message::{ConversationTurn, PromptMessage, Role};
pub use profile::ChatProfile;
pub use store::{CardStore, ProfileStore};
