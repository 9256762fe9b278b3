//! # TavernKit Prompt
//!
//! Everything between a stored character card and the message list a
//! chat-completion endpoint receives:
//!
//! - [`substitute`] — persona placeholder rewriting (`{{user}}`,
//!   `{{char}}`) across strings and nested structures
//! - [`dialogue`] — example-dialogue parsing into structured turns
//! - [`budget`] — allow-listed byte estimation for context sizing
//! - [`assemble`] — the ordered prompt-construction engine
//! - [`truncate`] — line-boundary response truncation for transports
//!   with a message-size cap
//!
//! All of it is synchronous, deterministic, and pure: identical inputs
//! always produce identical message lists.

pub mod assemble;
pub mod budget;
pub mod dialogue;
pub mod substitute;
pub mod truncate;

pub use assemble::{
    AssemblerDefaults, AssemblyInput, AssemblyOutput, NewMessage, PromptAssembler,
    CHAT_BOUNDARY_MARKER,
};
pub use budget::{approx_tokens, estimate_content_bytes, estimate_size};
pub use dialogue::parse_example_dialogue;
pub use substitute::Replacements;
pub use truncate::{split_response, truncate_response};
