use std::path::{
    Component,
    Path,
    PathBuf,
};

use crate::core::SyncError;

pub fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// A directory of markdown documents, addressed by `/`-separated relative paths.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    name: String,
}

impl Vault {
    /// Opens `root`; the vault name defaults to the directory's own name.
    pub fn open(root: impl AsRef<Path>, name: Option<String>) -> Result<Self, SyncError> {
        let root = std::fs::canonicalize(root.as_ref())?;
        let name = match name {
            Some(name) => name,
            None => root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "vault".to_string()),
        };
        Ok(Self { root, name })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of `file` relative to the vault root, always with `/` separators.
    pub fn document_path(&self, file: &Path) -> Result<String, SyncError> {
        let absolute = std::fs::canonicalize(file)?;
        let relative = absolute.strip_prefix(&self.root).map_err(|_| SyncError::OutsideVault {
            document: absolute.clone(),
            vault: self.root.clone(),
        })?;

        Ok(relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"))
    }

    pub async fn read(&self, document_path: &str) -> Result<String, SyncError> {
        Ok(tokio::fs::read_to_string(self.root.join(document_path)).await?)
    }
}
