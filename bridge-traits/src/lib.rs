//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that is provided differently per platform (desktop, web).
//!
//! ## Traits
//!
//! - [`SettingsStore`](storage::SettingsStore) - Durable string key/value storage
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Settings backend |
//! |----------|---------------------|------------------|
//! | Desktop  | `bridge-desktop`    | JSON file in the data directory |
//! | Web      | `bridge-wasm`       | `window.localStorage` |
//! | Tests    | this crate          | [`MemorySettingsStore`](storage::MemorySettingsStore) |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations convert their native errors (I/O, JavaScript
//! exceptions, quota errors) into it instead of panicking.
//!
//! ## Thread Safety
//!
//! Bridge traits require [`PlatformSendSync`](platform::PlatformSendSync), which is
//! `Send + Sync` on native targets and a no-op on `wasm32`, where browser
//! objects are single-threaded.

pub mod error;
pub mod platform;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use storage::{MemorySettingsStore, SettingsStore};
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
