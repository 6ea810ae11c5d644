use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::debug;

use crate::core::SyncError;

pub mod cache;
pub mod state;

pub use cache::IdentityCache;
pub use state::{
    PersistedState,
    StateStore,
    SyncSettings,
};

const APP_NAME: &str = "vaultcards";
pub const STATE_FILE_NAME: &str = "data.json";

pub fn get_app_data_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(data_dir) => data_dir.join(APP_NAME),
        None => PathBuf::from("."),
    }
}

pub fn default_state_path() -> PathBuf {
    get_app_data_dir().join(STATE_FILE_NAME)
}

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    debug!("Data saved to: {}", path.display());
    Ok(())
}

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, SyncError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&json)?;
    debug!("Data loaded from: {}", path.display());
    Ok(data)
}
