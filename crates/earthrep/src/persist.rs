//! Mirroring the record store to durable storage.
//!
//! The whole store is serialized as one JSON array under a single key and
//! overwritten on every save. Loading never fails on bad content: a missing
//! key or a blob that doesn't parse yields an empty store.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::storage::KeyValueStorage;
use crate::store::RecordStore;

/// Serialize the full store and write it under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the storage write fails.
pub fn save<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    key: &str,
    store: &RecordStore,
) -> Result<()> {
    let blob = serde_json::to_string(store)?;
    storage.set_item(key, &blob)?;
    debug!("Saved {} records under '{}'", store.len(), key);
    Ok(())
}

/// Read the store saved under `key`.
///
/// Absent or malformed content gives an empty store.
///
/// # Errors
///
/// Returns an error only if the storage backend itself cannot be read.
pub fn load<S: KeyValueStorage + ?Sized>(storage: &S, key: &str) -> Result<RecordStore> {
    let Some(blob) = storage.get_item(key)? else {
        debug!("Nothing stored under '{}'", key);
        return Ok(RecordStore::new());
    };

    match serde_json::from_str::<Option<RecordStore>>(&blob) {
        Ok(Some(store)) => {
            debug!("Loaded {} records from '{}'", store.len(), key);
            Ok(store)
        }
        Ok(None) => Ok(RecordStore::new()),
        Err(e) => {
            warn!(key, error = %e, "Ignoring malformed stored records");
            Ok(RecordStore::new())
        }
    }
}

/// Delete everything stored under `key`.
///
/// # Errors
///
/// Returns an error if the storage write fails.
pub fn clear<S: KeyValueStorage + ?Sized>(storage: &mut S, key: &str) -> Result<()> {
    if storage.remove_item(key)? {
        info!("Removed stored records under '{}'", key);
    }
    Ok(())
}
