//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `SettingsStore` using a JSON document stored in the OS data directory
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::FileSettingsStore;
//! use bridge_traits::SettingsStore;
//!
//! let store = FileSettingsStore::open_default()?;
//! store.set_string("likedSongs", "[1,3,7]")?;
//! ```

mod settings;

pub use settings::{default_settings_path, FileSettingsStore, APP_DIR_NAME, SETTINGS_FILE_NAME};
