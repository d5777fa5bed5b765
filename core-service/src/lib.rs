//! Core service façade and bootstrap helpers.
//!
//! This crate wires a host-provided [`SettingsStore`](bridge_traits::SettingsStore)
//! and [`Clock`] into the catalog and the liked-songs / playlist store, and
//! presents one view over catalog playlists, user playlists and the derived
//! "Liked Songs" playlist. Desktop apps typically enable the `desktop-shims`
//! feature (which depends on `bridge-desktop`), whereas WebAssembly builds
//! enable the `wasm` feature and persist through `localStorage` via
//! `bridge-wasm`.

pub mod error;

pub use error::{CoreError, Result};

pub use core_library::{
    Catalog, LibraryStore, Playlist, PlaylistId, PlaylistMutation, Song, SongId, UserPlaylist,
    LIKED_SONGS_PLAYLIST_ID,
};
pub use core_runtime::{CoreConfig, CoreConfigBuilder};

use std::sync::Arc;

use bridge_traits::Clock;
use core_library::models::normalize;
use core_library::{is_reserved_playlist, liked_songs_playlist};
use core_runtime::logging::init_logging;
use tracing::{debug, info};

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share the catalog and the store.
#[derive(Clone)]
pub struct CoreService {
    catalog: Arc<Catalog>,
    store: Arc<LibraryStore>,
    clock: Arc<dyn Clock>,
}

impl CoreService {
    /// Create a new service over `catalog`, persisting through the
    /// configured settings store.
    pub fn new(config: CoreConfig, catalog: Catalog) -> Self {
        let store = LibraryStore::new(config.settings_store, Arc::clone(&config.clock));
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(store),
            clock: config.clock,
        }
    }

    /// Create a service, loading the catalog from `config.catalog_path` or
    /// the embedded dataset.
    pub fn from_config(config: CoreConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin()?,
        };
        Ok(Self::new(config, catalog))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Direct access to liked songs and user playlist records
    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    // =========================================================================
    // Playlist views
    // =========================================================================

    /// The "Liked Songs" playlist as of now
    pub fn liked_songs_playlist(&self) -> Playlist {
        liked_songs_playlist(&self.store.liked_songs(), self.clock.today())
    }

    /// User playlists shaped like catalog playlists, covered by their first song
    pub fn user_playlists(&self) -> Vec<Playlist> {
        let today = self.clock.today();
        self.store
            .user_playlists()
            .iter()
            .map(|record| record.to_playlist(self.catalog.cover_for(&record.songs), today))
            .collect()
    }

    /// Resolve any playlist id: liked songs, then catalog, then user playlists
    pub fn playlist(&self, id: PlaylistId) -> Option<Playlist> {
        if is_reserved_playlist(id) {
            return Some(self.liked_songs_playlist());
        }

        if let Some(playlist) = self.catalog.playlist(id) {
            return Some(playlist.clone());
        }

        self.store.user_playlist(id).map(|record| {
            record.to_playlist(self.catalog.cover_for(&record.songs), self.clock.today())
        })
    }

    /// "Liked Songs" followed by the catalog playlists
    pub fn all_playlists(&self) -> Vec<Playlist> {
        let mut playlists = Vec::with_capacity(self.catalog.playlists().len() + 1);
        playlists.push(self.liked_songs_playlist());
        playlists.extend(self.catalog.playlists().iter().cloned());
        playlists
    }

    /// Songs of any playlist.
    ///
    /// Catalog playlists list songs in catalog order. "Liked Songs" keeps the
    /// order songs were liked in and user playlists keep their stored order.
    pub fn songs_by_playlist(&self, id: PlaylistId) -> Vec<&Song> {
        if is_reserved_playlist(id) {
            return self.catalog.songs_by_ids(&self.store.liked_songs());
        }

        if self.catalog.playlist(id).is_some() {
            return self.catalog.songs_by_playlist(id);
        }

        match self.store.user_playlist(id) {
            Some(record) => self.catalog.songs_by_ids(&record.songs),
            None => Vec::new(),
        }
    }

    /// Playlists whose name or description contains `query`, across
    /// "Liked Songs", the catalog and user playlists
    pub fn search_playlists(&self, query: &str) -> Vec<Playlist> {
        let needle = normalize(query);
        let mut results: Vec<Playlist> = Vec::new();

        let liked = self.liked_songs_playlist();
        if liked.matches(&needle) {
            results.push(liked);
        }

        results.extend(self.catalog.search_playlists(query).into_iter().cloned());
        results.extend(
            self.user_playlists()
                .into_iter()
                .filter(|playlist| playlist.matches(&needle)),
        );
        results
    }

    // =========================================================================
    // Likes
    // =========================================================================

    pub fn is_song_liked(&self, song: SongId) -> bool {
        self.store.is_song_liked(song)
    }

    /// Flip the liked state of `song` and return the new state
    pub fn toggle_like(&self, song: SongId) -> Result<bool> {
        if self.store.is_song_liked(song) {
            self.store.unlike_song(song)?;
            Ok(false)
        } else {
            self.store.like_song(song)?;
            Ok(true)
        }
    }

    // =========================================================================
    // User playlist changes
    // =========================================================================

    pub fn create_playlist(&self, name: impl Into<String>) -> Result<UserPlaylist> {
        Ok(self.store.create_playlist(name)?)
    }

    /// Add a song to a user playlist.
    ///
    /// Catalog playlists and "Liked Songs" cannot be edited this way and
    /// report [`PlaylistMutation::NotFound`]; use [`toggle_like`](Self::toggle_like)
    /// for liked songs.
    pub fn add_song_to_playlist(
        &self,
        playlist: PlaylistId,
        song: SongId,
    ) -> Result<PlaylistMutation> {
        if is_reserved_playlist(playlist) {
            debug!(song_id = %song, "Ignoring direct edit of liked songs playlist");
            return Ok(PlaylistMutation::NotFound);
        }
        Ok(self.store.add_song_to_playlist(playlist, song)?)
    }

    pub fn remove_song_from_playlist(
        &self,
        playlist: PlaylistId,
        song: SongId,
    ) -> Result<PlaylistMutation> {
        if is_reserved_playlist(playlist) {
            debug!(song_id = %song, "Ignoring direct edit of liked songs playlist");
            return Ok(PlaylistMutation::NotFound);
        }
        Ok(self.store.remove_song_from_playlist(playlist, song)?)
    }

    /// Delete a user playlist. "Liked Songs" cannot be deleted.
    pub fn delete_playlist(&self, playlist: PlaylistId) -> Result<bool> {
        if is_reserved_playlist(playlist) {
            return Ok(false);
        }
        Ok(self.store.delete_playlist(playlist)?)
    }
}

/// Install logging from `config` and build the service.
///
/// A global subscriber that is already installed (e.g. by the host) is left
/// in place.
pub fn bootstrap(config: CoreConfig) -> Result<CoreService> {
    if let Err(err) = init_logging(config.logging.clone()) {
        debug!(error = %err, "Logging already initialized, keeping existing subscriber");
    }

    let service = CoreService::from_config(config)?;
    info!(
        songs = service.catalog().songs().len(),
        playlists = service.catalog().playlists().len(),
        liked = service.store().liked_songs().len(),
        "Core service ready"
    );
    Ok(service)
}

/// Convenience bootstrapper for desktop hosts.
///
/// Liked songs and playlists are kept in the default settings file under the
/// user's data directory.
#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub fn bootstrap_desktop() -> Result<CoreService> {
    let config = CoreConfig::builder().build()?;
    let settings_path = config
        .storage_path
        .clone()
        .or_else(bridge_desktop::default_settings_path);
    info!(path = ?settings_path, "Using desktop settings file");
    bootstrap(config)
}

/// Convenience bootstrapper for WebAssembly hosts.
///
/// With no namespace the store uses the origin's raw `likedSongs` and
/// `userPlaylists` keys, sharing state with the existing web front end.
///
/// ```ignore
/// let core = core_service::bootstrap_wasm(None)?;
/// core.toggle_like(core_service::SongId(5))?;
/// ```
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub fn bootstrap_wasm(namespace: Option<&str>) -> Result<CoreService> {
    use bridge_wasm::WasmSettingsStore;

    let settings = match namespace {
        Some(namespace) => WasmSettingsStore::new(namespace),
        None => WasmSettingsStore::origin_scoped(),
    }
    .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

    let config = CoreConfig::builder()
        .settings_store(Arc::new(settings))
        .build()?;
    bootstrap(config)
}
