//! # Core Configuration Module
//!
//! Provides configuration management for the player core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the bridges and settings the core needs. It enforces
//! fail-fast validation so a missing capability is reported at startup rather
//! than on the first like/unlike.
//!
//! ## Required Dependencies
//!
//! - `SettingsStore` - Durable storage for liked songs and user playlists
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `Clock` - Defaults to [`SystemClock`]
//! - `LoggingConfig` - Defaults to [`LoggingConfig::default`]
//!
//! When the `desktop-shims` feature is enabled, a `FileSettingsStore` is
//! injected automatically if no settings store is provided.
//!
//! ## Usage
//!
//! ```
//! use bridge_traits::MemorySettingsStore;
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .settings_store(Arc::new(MemorySettingsStore::new()))
//!     .build()
//!     .expect("config");
//! assert!(config.catalog_path.is_none());
//! ```

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use bridge_traits::{Clock, SettingsStore, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Core configuration for the player core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Durable key/value storage for user state (required)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Time source for playlist identifiers and dates
    pub clock: Arc<dyn Clock>,

    /// Where the desktop settings file lives, if overridden
    pub storage_path: Option<PathBuf>,

    /// Alternative catalog JSON to load instead of the built-in dataset
    pub catalog_path: Option<PathBuf>,

    /// Logging setup applied by the service bootstrap
    pub logging: LoggingConfig,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("settings_store", &"SettingsStore { ... }")
            .field("clock", &"Clock { ... }")
            .field("storage_path", &self.storage_path)
            .field("catalog_path", &self.catalog_path)
            .field("logging", &self.logging)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks that overridden paths are not empty.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.storage_path {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("Storage path cannot be empty".to_string()));
            }
        }

        if let Some(path) = &self.catalog_path {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("Catalog path cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(not(all(feature = "desktop-shims", not(target_arch = "wasm32"))))]
fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required for liked songs and playlists. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default FileSettingsStore. \
                 Web: inject WasmSettingsStore (localStorage). \
                 Tests: inject MemorySettingsStore."
            .to_string(),
    }
}

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
fn provide_default_settings_store(storage_path: Option<&Path>) -> Result<Arc<dyn SettingsStore>> {
    use bridge_desktop::{default_settings_path, FileSettingsStore};

    let path = match storage_path {
        Some(path) => path.to_path_buf(),
        None => default_settings_path().ok_or_else(|| Error::CapabilityMissing {
            capability: "SettingsStore".to_string(),
            message: "No user data directory is available for the default FileSettingsStore. \
                     Set .storage_path() or inject a SettingsStore."
                .to_string(),
        })?,
    };

    let store = FileSettingsStore::new(path).map_err(|e| {
        Error::Internal(format!("Failed to initialize default SettingsStore: {}", e))
    })?;

    let store: Arc<dyn SettingsStore> = Arc::new(store);
    Ok(store)
}

#[cfg(not(all(feature = "desktop-shims", not(target_arch = "wasm32"))))]
fn provide_default_settings_store(_storage_path: Option<&Path>) -> Result<Arc<dyn SettingsStore>> {
    Err(settings_store_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Set options incrementally, then call [`build()`](CoreConfigBuilder::build).
#[derive(Default)]
pub struct CoreConfigBuilder {
    settings_store: Option<Arc<dyn SettingsStore>>,
    clock: Option<Arc<dyn Clock>>,
    storage_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    logging: Option<LoggingConfig>,
}

impl CoreConfigBuilder {
    /// Sets the settings store implementation (required).
    ///
    /// ```ignore
    /// let builder = CoreConfig::builder()
    ///     .settings_store(Arc::new(WasmSettingsStore::origin_scoped()?));
    /// ```
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Sets the time source. Default: [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets where the default desktop settings file is created.
    ///
    /// Ignored when a settings store is injected explicitly.
    pub fn storage_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Loads the catalog from this JSON file instead of the built-in dataset.
    pub fn catalog_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Sets the logging configuration.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no settings store was injected and
    ///   no platform default is available
    /// - [`Error::Config`] when a configured path is empty
    pub fn build(self) -> Result<CoreConfig> {
        let settings_store = match self.settings_store {
            Some(store) => store,
            None => provide_default_settings_store(self.storage_path.as_deref())?,
        };

        let config = CoreConfig {
            settings_store,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            storage_path: self.storage_path,
            catalog_path: self.catalog_path,
            logging: self.logging.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
