//! In-memory [`NoteStore`] used by the sync tests.

use std::{
    collections::{
        BTreeMap,
        BTreeSet,
    },
    sync::Mutex,
};

use async_trait::async_trait;

use super::{
    NewNote,
    NoteFields,
    NoteStore,
};
use crate::core::SyncError;

#[derive(Debug, Clone)]
pub struct StoredNote {
    pub deck: String,
    pub fields: NoteFields,
    pub tags: BTreeSet<String>,
    pub cards: Vec<u64>,
}

#[derive(Debug, Default)]
struct Inner {
    decks: BTreeSet<String>,
    notes: BTreeMap<u64, StoredNote>,
    card_decks: BTreeMap<u64, String>,
    next_id: u64,
    calls: Vec<String>,
    fail_create_deck: bool,
    fail_add_containing: Option<String>,
    fail_update_for: Option<u64>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create_deck(&self) {
        self.inner.lock().unwrap().fail_create_deck = true;
    }

    /// Rejects `add_note` when the front field contains `text`.
    pub fn fail_add_containing(&self, text: &str) {
        self.inner.lock().unwrap().fail_add_containing = Some(text.to_string());
    }

    pub fn fail_update_for(&self, note_id: u64) {
        self.inner.lock().unwrap().fail_update_for = Some(note_id);
    }

    /// Inserts a note directly, bypassing the sync engine.
    pub fn seed_note(&self, deck: &str, tags: &[&str]) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        let note = NewNote {
            deck_name: deck.to_string(),
            model_name: "Basic".to_string(),
            fields: NoteFields::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };
        inner.insert(&note)
    }

    pub fn move_note(&self, note_id: u64, deck: &str) {
        let mut inner = self.inner.lock().unwrap();
        let cards = inner.notes.get(&note_id).map(|n| n.cards.clone()).unwrap_or_default();
        for card in cards {
            inner.card_decks.insert(card, deck.to_string());
        }
        if let Some(note) = inner.notes.get_mut(&note_id) {
            note.deck = deck.to_string();
        }
    }

    pub fn note(&self, note_id: u64) -> Option<StoredNote> {
        self.inner.lock().unwrap().notes.get(&note_id).cloned()
    }

    pub fn note_count(&self) -> usize {
        self.inner.lock().unwrap().notes.len()
    }

    pub fn decks(&self) -> Vec<String> {
        self.inner.lock().unwrap().decks.iter().cloned().collect()
    }

    pub fn card_deck(&self, card_id: u64) -> Option<String> {
        self.inner.lock().unwrap().card_decks.get(&card_id).cloned()
    }

    /// Names of the store operations invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

impl Inner {
    fn insert(&mut self, note: &NewNote) -> u64 {
        self.next_id += 1;
        let note_id = self.next_id;
        let card_id = note_id * 100;

        self.card_decks.insert(card_id, note.deck_name.clone());
        self.notes.insert(
            note_id,
            StoredNote {
                deck: note.deck_name.clone(),
                fields: note.fields.clone(),
                tags: note.tags.iter().cloned().collect(),
                cards: vec![card_id],
            },
        );
        note_id
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn create_deck(&self, deck: &str) -> Result<(), SyncError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("createDeck".to_string());
        if inner.fail_create_deck {
            return Err(SyncError::Remote("collection is not available".to_string()));
        }
        inner.decks.insert(deck.to_string());
        Ok(())
    }

    async fn add_note(&self, note: &NewNote) -> Result<u64, SyncError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("addNote".to_string());

        let front = note.fields.get(super::FRONT_FIELD).cloned().unwrap_or_default();
        if let Some(text) = &inner.fail_add_containing {
            if front.contains(text.as_str()) {
                return Err(SyncError::Remote("cannot create note because it is empty".to_string()));
            }
        }
        if !inner.decks.contains(&note.deck_name) {
            return Err(SyncError::Remote(format!("deck was not found: {}", note.deck_name)));
        }
        let duplicate =
            inner.notes.values().any(|n| n.deck == note.deck_name && n.fields == note.fields);
        if duplicate {
            return Err(SyncError::Remote("cannot create note because it is a duplicate".to_string()));
        }

        Ok(inner.insert(note))
    }

    async fn update_note_fields(&self, note_id: u64, fields: &NoteFields) -> Result<(), SyncError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("updateNoteFields".to_string());
        if inner.fail_update_for == Some(note_id) {
            return Err(SyncError::Remote(format!("note was not found: {note_id}")));
        }
        match inner.notes.get_mut(&note_id) {
            Some(note) => {
                note.fields.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                Ok(())
            }
            None => Err(SyncError::Remote(format!("note was not found: {note_id}"))),
        }
    }

    async fn add_tags(&self, note_ids: &[u64], tags: &[String]) -> Result<(), SyncError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("addTags".to_string());
        for note_id in note_ids {
            if let Some(note) = inner.notes.get_mut(note_id) {
                note.tags.extend(tags.iter().cloned());
            }
        }
        Ok(())
    }

    async fn find_notes_by_tag(&self, tag: &str) -> Result<Vec<u64>, SyncError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("findNotes".to_string());
        Ok(inner.notes.iter().filter(|(_, n)| n.tags.contains(tag)).map(|(id, _)| *id).collect())
    }

    async fn note_card_ids(&self, note_id: u64) -> Result<Vec<u64>, SyncError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("notesInfo".to_string());
        Ok(inner.notes.get(&note_id).map(|n| n.cards.clone()).unwrap_or_default())
    }

    async fn change_deck(&self, card_ids: &[u64], deck: &str) -> Result<(), SyncError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("changeDeck".to_string());
        inner.decks.insert(deck.to_string());
        for card_id in card_ids {
            inner.card_decks.insert(*card_id, deck.to_string());
        }
        for note in inner.notes.values_mut() {
            if note.cards.iter().any(|c| card_ids.contains(c)) {
                note.deck = deck.to_string();
            }
        }
        Ok(())
    }
}
