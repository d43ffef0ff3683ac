//! JSON codec for whole-collection slots

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ExpenseError;

use super::backend::KeyValueStore;

/// Decode the collection stored under `key`
///
/// A slot that was never written is an empty collection. A slot that
/// exists but does not decode is `StorageUnavailable`.
pub fn read_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, ExpenseError> {
    let Some(text) = store.get(key)? else {
        return Ok(Vec::new());
    };

    // An empty file left behind by an interrupted first run
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&text).map_err(|e| {
        warn!(key, error = %e, "persisted collection could not be decoded");
        ExpenseError::storage_unavailable(key, e.to_string())
    })
}

/// Encode and store the whole collection under `key`
pub fn write_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), ExpenseError> {
    let text = serde_json::to_string_pretty(items)?;
    store.set(key, &text)?;
    debug!(key, count = items.len(), "collection written");
    Ok(())
}
