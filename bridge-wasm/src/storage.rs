//! WebAssembly implementation of the settings storage bridge.
//!
//! Values live in `window.localStorage` as plain strings. An origin-scoped
//! store uses keys verbatim, which keeps the persisted layout identical to
//! what the JavaScript front end reads and writes (`likedSongs`,
//! `userPlaylists`). A namespaced store prefixes every key so several host
//! shells can coexist on one origin without clobbering each other's data.

use bridge_traits::{error::Result as BridgeResult, storage::SettingsStore};
use tracing::debug;

use crate::error::WasmError;

const SETTINGS_PREFIX: &str = "settings";

fn local_storage() -> BridgeResult<web_sys::Storage> {
    let window = web_sys::window().ok_or_else(|| WasmError::Unavailable("window".into()))?;
    let storage = window
        .local_storage()
        .map_err(|err| WasmError::from_js("localStorage", err))?
        .ok_or_else(|| WasmError::Unavailable("localStorage".into()))?;
    Ok(storage)
}

fn namespaced_prefix(namespace: &str) -> String {
    format!("{namespace}::{SETTINGS_PREFIX}::")
}

#[derive(Clone)]
/// Browser-backed settings store (plain-text key/value pairs).
pub struct WasmSettingsStore {
    storage: web_sys::Storage,
    /// Empty for the origin-scoped store
    prefix: String,
}

impl WasmSettingsStore {
    /// Construct a store whose keys are written verbatim into `localStorage`.
    pub fn origin_scoped() -> BridgeResult<Self> {
        Ok(Self {
            storage: local_storage()?,
            prefix: String::new(),
        })
    }

    /// Construct a new settings store scoped to the provided namespace.
    pub fn new(namespace: impl AsRef<str>) -> BridgeResult<Self> {
        Ok(Self {
            storage: local_storage()?,
            prefix: namespaced_prefix(namespace.as_ref()),
        })
    }

    fn key_for(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl SettingsStore for WasmSettingsStore {
    fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
        let value = self
            .storage
            .get_item(&self.key_for(key))
            .map_err(|err| WasmError::from_js("get setting", err))?;
        Ok(value)
    }

    fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.storage
            .set_item(&self.key_for(key), value)
            .map_err(|err| WasmError::from_js("set setting", err))?;
        debug!(key = key, bytes = value.len(), "Stored setting");
        Ok(())
    }

    fn delete(&self, key: &str) -> BridgeResult<()> {
        self.storage
            .remove_item(&self.key_for(key))
            .map_err(|err| WasmError::from_js("remove setting", err))?;
        Ok(())
    }

    fn list_keys(&self) -> BridgeResult<Vec<String>> {
        list_prefixed_keys(&self.storage, &self.prefix)
    }

    fn clear_all(&self) -> BridgeResult<()> {
        if self.prefix.is_empty() {
            self.storage
                .clear()
                .map_err(|err| WasmError::from_js("clear settings", err))?;
            return Ok(());
        }

        for key in self.list_keys()? {
            self.storage
                .remove_item(&self.key_for(&key))
                .map_err(|err| WasmError::from_js("clear setting", err))?;
        }
        Ok(())
    }
}

fn list_prefixed_keys(storage: &web_sys::Storage, prefix: &str) -> BridgeResult<Vec<String>> {
    let len = storage
        .length()
        .map_err(|err| WasmError::from_js("storage length", err))?;
    let mut keys = Vec::new();
    for idx in 0..len {
        if let Some(entry) = storage
            .key(idx)
            .map_err(|err| WasmError::from_js("storage key", err))?
        {
            if let Some(stripped) = entry.strip_prefix(prefix) {
                keys.push(stripped.to_string());
            }
        }
    }
    Ok(keys)
}
