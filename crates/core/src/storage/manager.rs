use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

use super::format;
use super::store::KeyValueStore;

/// High-level storage operations: save/load a portfolio through a key-value store.
pub struct StorageManager;

impl StorageManager {
    /// Write the full holdings list under `key`, replacing whatever was there.
    pub fn save(
        store: &dyn KeyValueStore,
        key: &str,
        portfolio: &Portfolio,
    ) -> Result<(), CoreError> {
        let bytes = format::encode(&portfolio.holdings)?;
        store.set(key, &bytes)
    }

    /// Read the holdings list stored under `key`.
    ///
    /// `Ok(None)` means the key was never written (first launch), which
    /// callers treat differently from unreadable data.
    pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Option<Portfolio>, CoreError> {
        match store.get(key)? {
            Some(bytes) => Ok(Some(Portfolio::from_holdings(format::decode(&bytes)?))),
            None => Ok(None),
        }
    }
}
