//! Key-Value Storage Abstractions
//!
//! Provides the platform-agnostic settings store used to persist user state
//! (liked songs, user playlists) between sessions.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{BridgeError, Result};
use crate::platform::PlatformSendSync;

/// Key-value settings storage trait
///
/// Abstracts platform-specific durable string storage:
/// - Web: `localStorage` (origin scoped)
/// - Desktop: JSON document in the user's data directory
/// - Tests: in-memory map
///
/// Every call completes before returning. Implementations hold no caches, so
/// two stores pointed at the same medium observe each other's writes on the
/// next read; concurrent writers are last-write-wins per key.
///
/// # Example
///
/// ```
/// use bridge_traits::storage::{MemorySettingsStore, SettingsStore};
///
/// let store = MemorySettingsStore::new();
/// store.set_string("theme", "dark").unwrap();
/// assert_eq!(store.get_string("theme").unwrap().as_deref(), Some("dark"));
/// ```
pub trait SettingsStore: PlatformSendSync {
    /// Retrieve a string value, `None` when the key was never written
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Store a string value, replacing any previous value
    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a setting. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key)?.is_some())
    }

    /// List all setting keys
    fn list_keys(&self) -> Result<Vec<String>>;

    /// Clear all settings
    fn clear_all(&self) -> Result<()>;
}

/// In-memory settings store
///
/// Nothing survives the process; useful for tests and for hosts that have no
/// durable medium available.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw values
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| BridgeError::OperationFailed("settings lock poisoned".to_string()))
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn clear_all(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}
