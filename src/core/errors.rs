use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot reach AnkiConnect, make sure Anki is running with the add-on enabled: {0}")]
    Http(Box<reqwest::Error>),

    #[error("AnkiConnect returned status {0}")]
    Status(u16),

    /// Logical error string reported by the store itself.
    #[error("{0}")]
    Remote(String),

    #[error("AnkiConnect returned an empty result for {0}")]
    EmptyResult(&'static str),

    #[error("Failed to render card content: {0}")]
    Render(String),

    #[error("Not a markdown document: {}", .0.display())]
    NotMarkdown(PathBuf),

    #[error("Document {} is outside the vault {}", .document.display(), .vault.display())]
    OutsideVault { document: PathBuf, vault: PathBuf },
}

impl From<std::io::Error> for SyncError {
    fn from(error: std::io::Error) -> Self {
        SyncError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(error: reqwest::Error) -> Self {
        SyncError::Http(Box::new(error))
    }
}
