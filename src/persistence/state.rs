use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    load_json,
    save_json,
    IdentityCache,
};
use crate::{
    anki::api::DEFAULT_ANKI_CONNECT_URL,
    core::SyncError,
};

pub const DEFAULT_MARKER: &str = "ANKI";
pub const DEFAULT_DECK_ROOT: &str = "Obsidian";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncSettings {
    /// Token inside the card delimiters, e.g. `ANKI` for `<!--ANKI-START-->`.
    pub marker: String,
    pub group_root_name: String,
    pub store_address: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            group_root_name: DEFAULT_DECK_ROOT.to_string(),
            store_address: DEFAULT_ANKI_CONNECT_URL.to_string(),
        }
    }
}

impl SyncSettings {
    /// An empty marker is kept; syncing then finds nothing until it is set again.
    pub fn set_marker(&mut self, marker: &str) {
        self.marker = marker.to_string();
    }

    pub fn set_group_root_name(&mut self, root: &str) {
        self.group_root_name =
            if root.trim().is_empty() { DEFAULT_DECK_ROOT.to_string() } else { root.to_string() };
    }

    pub fn set_store_address(&mut self, address: &str) {
        self.store_address = if address.trim().is_empty() {
            DEFAULT_ANKI_CONNECT_URL.to_string()
        } else {
            address.to_string()
        };
    }
}

/// Everything written to the state file: user settings plus the identity cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub settings: SyncSettings,
    pub cards: IdentityCache,
}

/// State file loaded once at startup and written back after each batch.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: PersistedState,
}

impl StateStore {
    /// Missing files and unknown keys fall back to defaults; malformed JSON is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SyncError> {
        let path = path.into();
        let state = load_json::<PersistedState>(&path)?;
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.state.settings
    }

    pub fn settings_mut(&mut self) -> &mut SyncSettings {
        &mut self.state.settings
    }

    pub fn cache(&self) -> &IdentityCache {
        &self.state.cards
    }

    pub fn cache_mut(&mut self) -> &mut IdentityCache {
        &mut self.state.cards
    }

    pub fn save(&self) -> Result<(), SyncError> {
        save_json(&self.state, &self.path)
    }
}
