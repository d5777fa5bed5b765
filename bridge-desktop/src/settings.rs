//! Settings Storage using a JSON document on disk

use bridge_traits::{
    error::{BridgeError, Result},
    storage::SettingsStore,
};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Directory created under the OS data directory
pub const APP_DIR_NAME: &str = "playdeck";

/// File holding every setting as one JSON object
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Default settings location, e.g. `~/.local/share/playdeck/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

/// File-backed settings store implementation
///
/// The whole key/value map lives in a single JSON object. Every read goes
/// back to disk, so separate processes sharing the file see each other's
/// writes on their next read (last write wins). Writes replace the file via
/// a temporary sibling and a rename.
///
/// A corrupt document reads as an empty map. The next write replaces it.
pub struct FileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettingsStore {
    /// Create a new settings store at the given file path
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(BridgeError::Io)?;
            }
        }

        debug!(path = ?path, "Initialized settings store");

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Open the store at [`default_settings_path`]
    pub fn open_default() -> Result<Self> {
        let path = default_settings_path()
            .ok_or_else(|| BridgeError::NotAvailable("user data directory".to_string()))?;
        Self::new(path)
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(BridgeError::Io(err)),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(err) => {
                warn!(path = ?self.path, error = %err, "Settings file is corrupt, treating as empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn store(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let encoded = serde_json::to_string_pretty(map)
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to encode settings: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, encoded).map_err(BridgeError::Io)?;
        fs::rename(&tmp_path, &self.path).map_err(BridgeError::Io)?;
        Ok(())
    }

    /// Apply `change` to the current map and persist the result
    fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| BridgeError::OperationFailed("settings lock poisoned".to_string()))?;

        let mut map = self.load()?;
        change(&mut map);
        self.store(&map)
    }
}

impl SettingsStore for FileSettingsStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })?;

        debug!(key = key, bytes = value.len(), "Stored setting");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.update(|map| {
            map.remove(key);
        })?;

        debug!(key = key, "Deleted setting");
        Ok(())
    }

    fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.load()?.contains_key(key))
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }

    fn clear_all(&self) -> Result<()> {
        self.update(|map| map.clear())?;

        debug!("Cleared all settings");
        Ok(())
    }
}
