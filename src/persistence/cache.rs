use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    CardId,
    StoredCardReference,
};

/// Last known Anki note for every card this tool has synced.
///
/// Entries are only ever inserted or overwritten; a card that disappears from
/// its document simply leaves a stale entry behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityCache {
    entries: HashMap<CardId, StoredCardReference>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &CardId) -> Option<&StoredCardReference> {
        self.entries.get(id)
    }

    pub fn set(&mut self, id: CardId, reference: StoredCardReference) {
        self.entries.insert(id, reference);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
