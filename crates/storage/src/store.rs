use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Result, StorageError};

/// Core trait for storage backends.
///
/// Mirrors the browser local storage API: string keys, string values, last
/// write wins. Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns None if nothing is stored.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<()>;

    /// Removes the value stored under `key`. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Lists all stored keys, sorted.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Extension trait providing typed JSON access on top of [`Storage`].
#[async_trait]
pub trait StorageExt: Storage {
    /// Reads and deserializes the JSON value stored under `key`.
    async fn load_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get_item(key).await? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)?;
                metrics::counter!("storage_reads_total").increment(1);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serializes `value` as JSON and stores it under `key`.
    async fn save_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, raw).await?;
        metrics::counter!("storage_writes_total").increment(1);
        Ok(())
    }

    /// Returns true if anything is stored under `key`.
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key).await?.is_some())
    }
}

// Blanket implementation for all Storage implementations
impl<T: Storage + ?Sized> StorageExt for T {}

#[async_trait]
impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        (**self).keys().await
    }
}

/// Validates a storage key.
///
/// Keys must be non-empty and contain only ASCII letters, digits, `_`, `-`
/// and `.`, and must not start with `.`.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
