//! WebAssembly bindings for core-library
//!
//! Exposes the catalog queries and the liked-songs / playlist store to
//! JavaScript under the names the web front end already calls
//! (`getLikedSongs`, `likeSong`, `createPlaylist`, ...). Records cross the
//! boundary as plain objects through `serde-wasm-bindgen`; ids are JavaScript
//! numbers.

use crate::catalog::Catalog;
use crate::models::{AlbumId, GenreId, PlaylistId, SongId, UserPlaylist};
use crate::projection::liked_songs_playlist;
use crate::store::LibraryStore;
use bridge_traits::SystemClock;
use bridge_wasm::WasmSettingsStore;
use serde::Serialize;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JavaScript numbers are f64; ids must be whole
fn to_id(value: f64) -> Result<i64, JsValue> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= 9_007_199_254_740_991.0 {
        Ok(value as i64)
    } else {
        Err(JsValue::from_str(&format!("{} is not a valid id", value)))
    }
}

// =============================================================================
// Catalog - Exported to JavaScript
// =============================================================================

/// JavaScript-accessible catalog
#[wasm_bindgen]
pub struct JsCatalog {
    inner: Catalog,
}

#[wasm_bindgen]
impl JsCatalog {
    /// Load the embedded dataset
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<JsCatalog, JsValue> {
        Catalog::builtin()
            .map(|inner| JsCatalog { inner })
            .map_err(js_error)
    }

    /// Load a catalog from a JSON string
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<JsCatalog, JsValue> {
        Catalog::from_json(json)
            .map(|inner| JsCatalog { inner })
            .map_err(js_error)
    }

    pub fn songs(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.songs())
    }

    pub fn albums(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.albums())
    }

    pub fn playlists(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.playlists())
    }

    pub fn genres(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.genres())
    }

    #[wasm_bindgen(js_name = getSong)]
    pub fn get_song(&self, id: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.song(SongId(to_id(id)?)))
    }

    #[wasm_bindgen(js_name = getSongsByPlaylist)]
    pub fn get_songs_by_playlist(&self, playlist_id: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.songs_by_playlist(PlaylistId(to_id(playlist_id)?)))
    }

    #[wasm_bindgen(js_name = getSongsByAlbum)]
    pub fn get_songs_by_album(&self, album_id: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.songs_by_album(AlbumId(to_id(album_id)?)))
    }

    #[wasm_bindgen(js_name = getSongsByGenre)]
    pub fn get_songs_by_genre(&self, genre_id: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.songs_by_genre(GenreId(to_id(genre_id)?)))
    }

    #[wasm_bindgen(js_name = searchSongs)]
    pub fn search_songs(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.search_songs(query))
    }

    #[wasm_bindgen(js_name = searchAlbums)]
    pub fn search_albums(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.search_albums(query))
    }

    #[wasm_bindgen(js_name = searchPlaylists)]
    pub fn search_playlists(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.search_playlists(query))
    }

    /// Cover for a playlist given its song ids
    #[wasm_bindgen(js_name = coverFor)]
    pub fn cover_for(&self, songs: Vec<f64>) -> Result<String, JsValue> {
        let ids = songs
            .into_iter()
            .map(|id| to_id(id).map(SongId))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.inner.cover_for(&ids).to_string())
    }
}

// =============================================================================
// Store - Exported to JavaScript
// =============================================================================

/// JavaScript-accessible liked songs and user playlists, persisted in
/// `localStorage`
#[wasm_bindgen]
pub struct JsLibraryStore {
    inner: LibraryStore,
}

#[wasm_bindgen]
impl JsLibraryStore {
    /// Store using the raw `likedSongs` / `userPlaylists` keys of this origin
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<JsLibraryStore, JsValue> {
        let settings = WasmSettingsStore::origin_scoped().map_err(js_error)?;
        Ok(Self::with_settings(settings))
    }

    /// Store whose keys are prefixed with `namespace`
    #[wasm_bindgen(js_name = withNamespace)]
    pub fn with_namespace(namespace: &str) -> Result<JsLibraryStore, JsValue> {
        let settings = WasmSettingsStore::new(namespace).map_err(js_error)?;
        Ok(Self::with_settings(settings))
    }

    #[wasm_bindgen(js_name = getLikedSongs)]
    pub fn get_liked_songs(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.liked_songs())
    }

    #[wasm_bindgen(js_name = isSongLiked)]
    pub fn is_song_liked(&self, song_id: f64) -> Result<bool, JsValue> {
        Ok(self.inner.is_song_liked(SongId(to_id(song_id)?)))
    }

    #[wasm_bindgen(js_name = likeSong)]
    pub fn like_song(&self, song_id: f64) -> Result<(), JsValue> {
        self.inner
            .like_song(SongId(to_id(song_id)?))
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = unlikeSong)]
    pub fn unlike_song(&self, song_id: f64) -> Result<(), JsValue> {
        self.inner
            .unlike_song(SongId(to_id(song_id)?))
            .map_err(js_error)
    }

    /// The derived "Liked Songs" playlist
    #[wasm_bindgen(js_name = getLikedSongsPlaylist)]
    pub fn get_liked_songs_playlist(&self) -> Result<JsValue, JsValue> {
        let today = self.inner.clock().today();
        to_js(&liked_songs_playlist(&self.inner.liked_songs(), today))
    }

    #[wasm_bindgen(js_name = getUserPlaylists)]
    pub fn get_user_playlists(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.user_playlists())
    }

    #[wasm_bindgen(js_name = saveUserPlaylists)]
    pub fn save_user_playlists(&self, playlists: JsValue) -> Result<(), JsValue> {
        let playlists: Vec<UserPlaylist> =
            serde_wasm_bindgen::from_value(playlists).map_err(js_error)?;
        self.inner.save_user_playlists(&playlists).map_err(js_error)
    }

    #[wasm_bindgen(js_name = createPlaylist)]
    pub fn create_playlist(&self, name: String) -> Result<JsValue, JsValue> {
        let playlist = self.inner.create_playlist(name).map_err(js_error)?;
        to_js(&playlist)
    }

    #[wasm_bindgen(js_name = createPlaylistWithSongs)]
    pub fn create_playlist_with_songs(
        &self,
        name: &str,
        songs: Vec<f64>,
    ) -> Result<JsValue, JsValue> {
        let ids = songs
            .into_iter()
            .map(|id| to_id(id).map(SongId))
            .collect::<Result<Vec<_>, _>>()?;
        let playlist = self
            .inner
            .create_playlist_with_songs(name, &ids)
            .map_err(js_error)?;
        to_js(&playlist)
    }

    /// Returns `"applied"`, `"unchanged"` or `"notFound"`
    #[wasm_bindgen(js_name = addSongToPlaylist)]
    pub fn add_song_to_playlist(&self, playlist_id: f64, song_id: f64) -> Result<JsValue, JsValue> {
        let outcome = self
            .inner
            .add_song_to_playlist(PlaylistId(to_id(playlist_id)?), SongId(to_id(song_id)?))
            .map_err(js_error)?;
        to_js(&outcome)
    }

    /// Returns `"applied"`, `"unchanged"` or `"notFound"`
    #[wasm_bindgen(js_name = removeSongFromPlaylist)]
    pub fn remove_song_from_playlist(
        &self,
        playlist_id: f64,
        song_id: f64,
    ) -> Result<JsValue, JsValue> {
        let outcome = self
            .inner
            .remove_song_from_playlist(PlaylistId(to_id(playlist_id)?), SongId(to_id(song_id)?))
            .map_err(js_error)?;
        to_js(&outcome)
    }

    #[wasm_bindgen(js_name = deletePlaylist)]
    pub fn delete_playlist(&self, playlist_id: f64) -> Result<bool, JsValue> {
        self.inner
            .delete_playlist(PlaylistId(to_id(playlist_id)?))
            .map_err(js_error)
    }
}

// Internal constructors (not exported to JS)
impl JsLibraryStore {
    fn with_settings(settings: WasmSettingsStore) -> Self {
        Self {
            inner: LibraryStore::new(Arc::new(settings), Arc::new(SystemClock)),
        }
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Get the library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
