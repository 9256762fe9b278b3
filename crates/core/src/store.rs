//! Document store traits — the persistence boundary.
//!
//! Cards and chat profiles are persisted by an external collaborator
//! keyed by opaque string identifiers. The only contract beyond keyed
//! lookup/upsert is last-writer-wins per document.
//!
//! Implementations: in-memory (tavernkit-store), plus whatever database
//! adapter a deployment brings.

use crate::card::CharacterCard;
use crate::error::StoreError;
use crate::profile::ChatProfile;
use async_trait::async_trait;

/// Keyed storage for character cards.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Fetch a card by id.
    async fn get_card(&self, id: &str) -> Result<Option<CharacterCard>, StoreError>;

    /// Insert or replace a card (last-writer-wins).
    async fn upsert_card(&self, id: &str, card: CharacterCard) -> Result<(), StoreError>;

    /// Delete a card. Returns whether it existed.
    async fn delete_card(&self, id: &str) -> Result<bool, StoreError>;

    /// List stored card ids.
    async fn list_cards(&self) -> Result<Vec<String>, StoreError>;
}

/// Keyed storage for chat profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile by chat id.
    async fn get_profile(&self, chat_id: &str) -> Result<Option<ChatProfile>, StoreError>;

    /// Insert or replace a profile (last-writer-wins).
    async fn upsert_profile(&self, profile: ChatProfile) -> Result<(), StoreError>;

    /// Delete a profile. Returns whether it existed.
    async fn delete_profile(&self, chat_id: &str) -> Result<bool, StoreError>;
}
