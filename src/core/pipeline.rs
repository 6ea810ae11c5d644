use std::path::Path;

use tracing::{
    debug,
    error,
    info,
};

use super::{
    SyncError,
    SyncResult,
};
use crate::{
    anki::NoteStore,
    parser::extract_flashcards,
    persistence::StateStore,
    render::CardRenderer,
    sync::{
        DocumentContext,
        Reconciler,
    },
    vault::{
        is_markdown,
        Vault,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No marker configured, so nothing can be extracted.
    MarkerMissing,
    NoCards,
    Completed(SyncResult),
}

impl SyncOutcome {
    /// One-line notice for the user. Error details stay in the log.
    pub fn summary(&self) -> String {
        match self {
            SyncOutcome::MarkerMissing => {
                "Set a flashcard marker first, e.g. `vaultcards config --marker ANKI`.".to_string()
            }
            SyncOutcome::NoCards => "No flashcards found to sync.".to_string(),
            SyncOutcome::Completed(result) if result.has_errors() => format!(
                "Sync finished: {} created, {} updated, {} error(s). See the log for details.",
                result.created,
                result.updated,
                result.errors.len()
            ),
            SyncOutcome::Completed(result) => {
                format!("Sync finished: {} created, {} updated.", result.created, result.updated)
            }
        }
    }
}

/// Syncs the flashcards of one vault document.
///
/// The identity cache held by `state` is written back exactly once after the
/// batch runs, including when the batch aborts because the deck could not be
/// created.
pub async fn sync_document(
    vault: &Vault,
    file: &Path,
    state: &mut StateStore,
    store: &dyn NoteStore,
    renderer: &dyn CardRenderer,
) -> Result<SyncOutcome, SyncError> {
    if !is_markdown(file) {
        return Err(SyncError::NotMarkdown(file.to_path_buf()));
    }

    let marker = state.settings().marker.trim().to_string();
    if marker.is_empty() {
        return Ok(SyncOutcome::MarkerMissing);
    }

    let document_path = vault.document_path(file)?;
    let content = vault.read(&document_path).await?;
    let cards = extract_flashcards(&content, &marker);
    debug!(file = %document_path, cards = cards.len(), "Extracted flashcards");
    if cards.is_empty() {
        return Ok(SyncOutcome::NoCards);
    }

    let document =
        DocumentContext::new(&document_path, &state.settings().group_root_name, vault.name());
    info!(file = %document_path, deck = %document.deck, "Syncing {} card(s)", cards.len());

    let result = Reconciler::new(store, renderer, state.cache_mut()).reconcile(&document, &cards).await;
    let saved = state.save();

    if let Err(e) = &saved {
        error!(path = %state.path().display(), "Failed to save sync state: {e}");
    }
    let result = result?;
    saved?;

    for failure in &result.errors {
        error!(file = %document_path, "{failure}");
    }
    Ok(SyncOutcome::Completed(result))
}
