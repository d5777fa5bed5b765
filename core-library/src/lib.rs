//! # Library Module
//!
//! Owns the music catalog and the user's liked songs and playlists.
//!
//! ## Overview
//!
//! This crate provides:
//! - Domain models shared by the catalog and the store ([`models`])
//! - The read-only [`Catalog`] with lookups, scoped queries and text search
//! - [`LibraryStore`], which persists liked songs and user playlists through
//!   a host [`SettingsStore`](bridge_traits::SettingsStore)
//! - The derived "Liked Songs" playlist ([`projection`])
//! - JavaScript bindings on `wasm32` (`wasm` module)

pub mod catalog;
pub mod error;
pub mod models;
pub mod projection;
pub mod store;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use catalog::{Catalog, SearchResults};
pub use error::{LibraryError, Result};
pub use models::{
    Album, AlbumId, Genre, GenreId, Playlist, PlaylistId, Song, SongId, User, UserId,
    UserPlaylist,
};
pub use projection::{is_reserved_playlist, liked_songs_playlist, LIKED_SONGS_PLAYLIST_ID};
pub use store::{LibraryStore, PlaylistMutation, LIKED_SONGS_KEY, USER_PLAYLISTS_KEY};
