//! Reading the storage mirror at mount.

use serde::de::DeserializeOwned;
use storage::{Storage, StorageError, StorageExt};

/// Loads a mirrored value, treating an unreadable value as absent.
///
/// Storage I/O failures are still returned.
pub(crate) async fn load_mirror<S, T>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: Storage,
    T: DeserializeOwned + Send,
{
    match storage.load_json(key).await {
        Ok(value) => Ok(value),
        Err(StorageError::Serialization(e)) => {
            tracing::warn!(key, error = %e, "discarding unreadable storage value");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
