//! Directory catalog over the storage root.
//!
//! The catalog never caches: every call re-reads the directory, so files
//! dropped into the root are visible on the next request.

use std::path::{Component, Path, PathBuf};
use tokio::fs as async_fs;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.root.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the storage root if it does not exist yet.
    ///
    /// Returns `true` when the directory had to be created.
    pub async fn ensure_root(&self) -> Result<bool> {
        if async_fs::metadata(&self.root).await.is_ok() {
            return Ok(false);
        }

        async_fs::create_dir_all(&self.root).await?;
        tracing::warn!("Created music directory at {}", self.root.display());

        Ok(true)
    }

    /// Lists the root's immediate entries whose name contains `query`,
    /// ignoring case. An empty query matches everything.
    pub async fn list(&self, query: &str) -> Result<Vec<String>> {
        let needle = query.to_lowercase();

        let mut entries = async_fs::read_dir(&self.root).await.map_err(|e| {
            AppError::StorageUnavailable(format!("{}: {}", self.root.display(), e))
        })?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            AppError::StorageUnavailable(format!("{}: {}", self.root.display(), e))
        })? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };

            if name.to_lowercase().contains(&needle) {
                names.push(name);
            }
        }

        Ok(names)
    }

    /// Maps an identifier to a path under the root.
    ///
    /// Only a single plain file name is accepted; anything that could
    /// escape the root is reported as not found.
    pub fn resolve(&self, identifier: &str) -> Result<PathBuf> {
        if !is_plain_file_name(identifier) {
            return Err(AppError::NotFound(format!("File not found: {}", identifier)));
        }

        Ok(self.root.join(identifier))
    }

    /// Whether `path` still lies under the root once symlinks are followed.
    pub async fn contains(&self, path: &Path) -> Result<bool> {
        let root = async_fs::canonicalize(&self.root).await?;
        let target = async_fs::canonicalize(path).await?;

        Ok(target.starts_with(root))
    }
}

fn is_plain_file_name(identifier: &str) -> bool {
    if identifier.is_empty() || identifier.contains(['/', '\\', '\0']) {
        return false;
    }

    let mut components = Path::new(identifier).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
