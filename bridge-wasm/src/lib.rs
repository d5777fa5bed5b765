//! WebAssembly Bridge Implementations
//!
//! This crate provides WebAssembly-compatible implementations of the bridge
//! traits defined in `bridge-traits`, using browser APIs through `web-sys` and
//! `wasm-bindgen`.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It will not compile for native targets.
//!
//! # Implementations
//!
//! - `WasmSettingsStore`: `window.localStorage`, origin scoped or namespaced
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::WasmSettingsStore;
//! use bridge_traits::storage::SettingsStore;
//!
//! let store = WasmSettingsStore::origin_scoped()?;
//! store.set_string("likedSongs", "[1,3,7]")?;
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod error;
pub mod storage;

// Re-export commonly used types
pub use error::{WasmError, WasmResult};
pub use storage::WasmSettingsStore;
