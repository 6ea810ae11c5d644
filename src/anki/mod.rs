use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::SyncError;

pub mod api;
#[cfg(test)]
pub mod testing;

pub use api::AnkiConnect;

pub const DEFAULT_MODEL_NAME: &str = "Basic";
pub const FRONT_FIELD: &str = "Front";
pub const BACK_FIELD: &str = "Back";

/// Field name to rendered HTML, ordered so payloads serialize deterministically.
pub type NoteFields = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: NoteFields,
    pub tags: Vec<String>,
}

impl NewNote {
    pub fn basic(deck_name: &str, front: String, back: String, tags: Vec<String>) -> Self {
        Self {
            deck_name: deck_name.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            fields: basic_fields(front, back),
            tags,
        }
    }
}

pub fn basic_fields(front: String, back: String) -> NoteFields {
    NoteFields::from([(FRONT_FIELD.to_string(), front), (BACK_FIELD.to_string(), back)])
}

/// Everything the sync engine needs from the note store.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Creating a deck that already exists is a no-op.
    async fn create_deck(&self, deck: &str) -> Result<(), SyncError>;

    /// Returns the id of the new note. Duplicate content within the deck is rejected.
    async fn add_note(&self, note: &NewNote) -> Result<u64, SyncError>;

    async fn update_note_fields(&self, note_id: u64, fields: &NoteFields) -> Result<(), SyncError>;

    /// Union with the note's existing tags.
    async fn add_tags(&self, note_ids: &[u64], tags: &[String]) -> Result<(), SyncError>;

    async fn find_notes_by_tag(&self, tag: &str) -> Result<Vec<u64>, SyncError>;

    async fn note_card_ids(&self, note_id: u64) -> Result<Vec<u64>, SyncError>;

    async fn change_deck(&self, card_ids: &[u64], deck: &str) -> Result<(), SyncError>;
}
