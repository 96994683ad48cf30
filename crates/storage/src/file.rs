use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{Result, store::Storage, validate_key};

const EXTENSION: &str = ".json";

/// File-backed storage: one `<key>.json` file per key in a directory.
///
/// Writes go to a hidden temp file first and are renamed into place, so a
/// reader never sees a half-written value. There is no locking between
/// handles; the last rename wins.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Opens (creating if needed) a storage directory.
    #[tracing::instrument]
    pub async fn open(root: impl AsRef<Path> + std::fmt::Debug) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!(path = %root.display(), "file storage opened");
        Ok(Self { root })
    }

    /// Returns the storage directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}{EXTENSION}"))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{key}{EXTENSION}.tmp"))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        validate_key(key)?;
        let temp = self.temp_path_for(key);
        tokio::fs::write(&temp, value).await?;
        tokio::fs::rename(&temp, self.path_for(key)).await?;
        tracing::trace!(key, "storage file written");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut keys = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Some(key) = name.strip_suffix(EXTENSION) {
                keys.push(key.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
