//! Maps a document's extracted cards onto Anki notes.
//!
//! Each card is resolved to an existing note (identity cache first, then a tag
//! search for `card::{id}`) and either updated in place or created. Cards are
//! processed one at a time; a failure on one card is recorded and the batch
//! moves on, leaving that card's cache entry as it was.

use std::collections::HashSet;

use tracing::{
    debug,
    error,
    info,
    warn,
};

use crate::{
    anki::{
        basic_fields,
        NewNote,
        NoteStore,
    },
    core::{
        utils::{
            breadcrumb,
            card_id,
            deck_name,
            deep_link,
            sanitized_path_tag,
        },
        CardFailure,
        CardId,
        FlashcardDefinition,
        StoredCardReference,
        SyncError,
        SyncResult,
    },
    persistence::IdentityCache,
    render::{
        build_back_field,
        build_front_field,
        CardRenderer,
    },
};

/// Tag marking every note this tool manages.
pub const SYNC_TAG: &str = "vaultcards";

/// Where a document's cards go and how they point back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    pub path: String,
    pub deck: String,
    pub breadcrumb: String,
    pub vault_name: String,
}

impl DocumentContext {
    pub fn new(document_path: &str, deck_root: &str, vault_name: &str) -> Self {
        Self {
            path: document_path.to_string(),
            deck: deck_name(document_path, deck_root),
            breadcrumb: breadcrumb(document_path),
            vault_name: vault_name.to_string(),
        }
    }
}

pub fn card_tags(id: &CardId, document_path: &str) -> Vec<String> {
    let mut tags = vec![SYNC_TAG.to_string(), id.tag()];
    let path_tag = sanitized_path_tag(document_path);
    if !path_tag.is_empty() {
        tags.push(format!("path::{path_tag}"));
    }
    tags
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Cached(u64),
    Tagged(u64),
    Missing,
}

impl Resolution {
    fn note_id(self) -> Option<u64> {
        match self {
            Resolution::Cached(id) | Resolution::Tagged(id) => Some(id),
            Resolution::Missing => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardOutcome {
    Created,
    Updated,
}

pub struct Reconciler<'a> {
    store: &'a dyn NoteStore,
    renderer: &'a dyn CardRenderer,
    cache: &'a mut IdentityCache,
    ensured_decks: HashSet<String>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        store: &'a dyn NoteStore,
        renderer: &'a dyn CardRenderer,
        cache: &'a mut IdentityCache,
    ) -> Self {
        Self { store, renderer, cache, ensured_decks: HashSet::new() }
    }

    /// Syncs `cards` into the document's deck.
    ///
    /// Fails as a whole only when the deck itself cannot be created; every other
    /// failure is reported per card in [`SyncResult::errors`].
    pub async fn reconcile(
        &mut self,
        document: &DocumentContext,
        cards: &[FlashcardDefinition],
    ) -> Result<SyncResult, SyncError> {
        if let Err(e) = self.ensure_deck(&document.deck).await {
            error!(deck = %document.deck, "Failed to create deck: {e}");
            return Err(e);
        }

        let mut result = SyncResult::default();
        for card in cards {
            match self.reconcile_card(document, card).await {
                Ok(CardOutcome::Created) => result.created += 1,
                Ok(CardOutcome::Updated) => result.updated += 1,
                Err(e) => {
                    warn!(file = %document.path, line = card.line_number, "Failed to sync card: {e}");
                    result
                        .errors
                        .push(CardFailure { line_number: card.line_number, message: e.to_string() });
                }
            }
        }

        info!(
            file = %document.path,
            created = result.created,
            updated = result.updated,
            errors = result.errors.len(),
            "Reconciled document"
        );
        Ok(result)
    }

    async fn ensure_deck(&mut self, deck: &str) -> Result<(), SyncError> {
        if self.ensured_decks.contains(deck) {
            return Ok(());
        }
        self.store.create_deck(deck).await?;
        self.ensured_decks.insert(deck.to_string());
        Ok(())
    }

    // The cache wins over the tag search even if the two disagree.
    async fn resolve(&self, id: &CardId) -> Result<Resolution, SyncError> {
        if let Some(reference) = self.cache.get(id) {
            return Ok(Resolution::Cached(reference.note_id));
        }

        let found = self.store.find_notes_by_tag(&id.tag()).await?;
        Ok(found.first().map_or(Resolution::Missing, |&note_id| Resolution::Tagged(note_id)))
    }

    async fn reconcile_card(
        &mut self,
        document: &DocumentContext,
        card: &FlashcardDefinition,
    ) -> Result<CardOutcome, SyncError> {
        let id = card_id(&document.path, &card.front, &card.back);
        let resolution = self.resolve(&id).await?;
        debug!(card = %id, line = card.line_number, ?resolution, "Resolved card");

        let link = deep_link(&document.vault_name, &document.path, card.line_number);
        let front = build_front_field(
            self.renderer,
            &card.front,
            &document.path,
            &document.breadcrumb,
            &link,
        )?;
        let back = build_back_field(self.renderer, &card.back, &document.path, &document.breadcrumb)?;
        let tags = card_tags(&id, &document.path);

        let (note_id, outcome) = match resolution.note_id() {
            Some(note_id) => {
                self.store.update_note_fields(note_id, &basic_fields(front, back)).await?;
                self.store.add_tags(&[note_id], &tags).await?;
                self.move_into_deck(note_id, &document.deck).await?;
                (note_id, CardOutcome::Updated)
            }
            None => {
                self.ensure_deck(&document.deck).await?;
                let note = NewNote::basic(&document.deck, front, back, tags);
                (self.store.add_note(&note).await?, CardOutcome::Created)
            }
        };

        self.cache.set(
            id,
            StoredCardReference {
                note_id,
                file: document.path.clone(),
                line: card.line_number,
            },
        );
        Ok(outcome)
    }

    /// Anki ignores moves into the deck a card is already in, so every card is sent.
    async fn move_into_deck(&self, note_id: u64, deck: &str) -> Result<(), SyncError> {
        let card_ids = self.store.note_card_ids(note_id).await?;
        if card_ids.is_empty() {
            return Ok(());
        }
        self.store.change_deck(&card_ids, deck).await
    }
}
