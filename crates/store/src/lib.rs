//! In-memory store — useful for testing and ephemeral sessions.
//!
//! Both stores are keyed maps with last-writer-wins semantics. A
//! deployment that wants persistence brings its own database adapter
//! behind the same traits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tavernkit_core::card::CharacterCard;
use tavernkit_core::error::StoreError;
use tavernkit_core::profile::ChatProfile;
use tavernkit_core::store::{CardStore, ProfileStore};
use tokio::sync::RwLock;

/// An in-memory store holding cards and profiles in keyed maps.
#[derive(Default)]
pub struct MemoryStore {
    cards: Arc<RwLock<HashMap<String, CharacterCard>>>,
    profiles: Arc<RwLock<HashMap<String, ChatProfile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn get_card(&self, id: &str) -> Result<Option<CharacterCard>, StoreError> {
        Ok(self.cards.read().await.get(id).cloned())
    }

    async fn upsert_card(&self, id: &str, card: CharacterCard) -> Result<(), StoreError> {
        self.cards.write().await.insert(id.to_string(), card);
        Ok(())
    }

    async fn delete_card(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.cards.write().await.remove(id).is_some())
    }

    async fn list_cards(&self) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self.cards.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, chat_id: &str) -> Result<Option<ChatProfile>, StoreError> {
        Ok(self.profiles.read().await.get(chat_id).cloned())
    }

    async fn upsert_profile(&self, profile: ChatProfile) -> Result<(), StoreError> {
        self.profiles
            .write()
            .await
            .insert(profile.chat_id.clone(), profile);
        Ok(())
    }

    async fn delete_profile(&self, chat_id: &str) -> Result<bool, StoreError> {
        Ok(self.profiles.write().await.remove(chat_id).is_some())
    }
}
