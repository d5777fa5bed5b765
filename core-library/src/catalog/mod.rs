//! # Catalog
//!
//! Read-only songs, albums, playlists, genres and users, loaded once and
//! never mutated afterwards.
//!
//! Every query is total: unknown identifiers produce empty results and no
//! lookup ever fails. Text search lowercases both sides and matches by
//! substring, so an empty query matches everything.
//!
//! Queries scoped to a playlist, album or genre return songs in catalog
//! order, not in the order the playlist or album lists them. Use
//! [`Catalog::songs_by_ids`] when the caller's order matters.

use crate::error::{LibraryError, Result};
use crate::models::{
    normalize, Album, AlbumId, Genre, GenreId, Playlist, PlaylistId, Song, SongId, User, UserId,
    DEFAULT_COVER_URL,
};
use crate::projection::LIKED_SONGS_PLAYLIST_ID;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Dataset shipped with the player
const BUILTIN_CATALOG: &str = include_str!("catalog.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogData {
    songs: Vec<Song>,
    #[serde(default)]
    albums: Vec<Album>,
    #[serde(default)]
    playlists: Vec<Playlist>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    users: Vec<User>,
}

/// Combined result of [`Catalog::search`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults<'a> {
    pub songs: Vec<&'a Song>,
    pub albums: Vec<&'a Album>,
    pub playlists: Vec<&'a Playlist>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.albums.is_empty() && self.playlists.is_empty()
    }
}

/// Immutable in-memory catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    songs: Vec<Song>,
    albums: Vec<Album>,
    playlists: Vec<Playlist>,
    genres: Vec<Genre>,
    users: Vec<User>,
}

impl Catalog {
    /// Load the dataset embedded in the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON document with `songs`, `albums`,
    /// `playlists`, `genres` and `users` arrays.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Serialization`] if the document does not match the schema
    /// - [`LibraryError::InvalidInput`] if a playlist uses the reserved
    ///   liked-songs identifier or fails validation
    pub fn from_json(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::from_parts(
            data.songs,
            data.albums,
            data.playlists,
            data.genres,
            data.users,
        )
    }

    /// Read and load a catalog JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| LibraryError::InvalidInput {
            field: "catalog_path".to_string(),
            message: format!("cannot read {}: {}", path.display(), e),
        })?;

        info!(path = %path.display(), "Loading catalog from file");
        Self::from_json(&json)
    }

    /// Build a catalog from already-parsed collections.
    ///
    /// Album durations are recomputed from the songs present; any
    /// `total_duration` carried by the input is discarded.
    pub fn from_parts(
        songs: Vec<Song>,
        mut albums: Vec<Album>,
        playlists: Vec<Playlist>,
        genres: Vec<Genre>,
        users: Vec<User>,
    ) -> Result<Self> {
        for playlist in &playlists {
            if playlist.id == LIKED_SONGS_PLAYLIST_ID {
                return Err(LibraryError::InvalidInput {
                    field: "playlists".to_string(),
                    message: format!(
                        "playlist id {} is reserved for liked songs",
                        LIKED_SONGS_PLAYLIST_ID
                    ),
                });
            }

            playlist
                .validate()
                .map_err(|message| LibraryError::InvalidInput {
                    field: "playlists".to_string(),
                    message,
                })?;
        }

        for album in &albums {
            album.validate().map_err(|message| LibraryError::InvalidInput {
                field: "albums".to_string(),
                message,
            })?;
        }

        let durations: HashMap<SongId, u64> = songs
            .iter()
            .map(|song| (song.id, u64::from(song.duration)))
            .collect();

        for album in &mut albums {
            album.total_duration = album
                .songs
                .iter()
                .filter_map(|id| durations.get(id))
                .sum();
        }

        debug!(
            songs = songs.len(),
            albums = albums.len(),
            playlists = playlists.len(),
            genres = genres.len(),
            users = users.len(),
            "Catalog loaded"
        );

        Ok(Self {
            songs,
            albums,
            playlists,
            genres,
            users,
        })
    }

    // =========================================================================
    // Collections
    // =========================================================================

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    pub fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.iter().find(|album| album.id == id)
    }

    pub fn playlist(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|playlist| playlist.id == id)
    }

    pub fn genre(&self, id: GenreId) -> Option<&Genre> {
        self.genres.iter().find(|genre| genre.id == id)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    // =========================================================================
    // Scoped queries
    // =========================================================================

    /// Songs listed by a catalog playlist, in catalog order
    pub fn songs_by_playlist(&self, id: PlaylistId) -> Vec<&Song> {
        match self.playlist(id) {
            Some(playlist) => self.songs_in_catalog_order(&playlist.songs),
            None => Vec::new(),
        }
    }

    /// Songs listed by an album, in catalog order
    pub fn songs_by_album(&self, id: AlbumId) -> Vec<&Song> {
        match self.album(id) {
            Some(album) => self.songs_in_catalog_order(&album.songs),
            None => Vec::new(),
        }
    }

    /// Songs tagged with a genre, in catalog order
    pub fn songs_by_genre(&self, id: GenreId) -> Vec<&Song> {
        self.songs.iter().filter(|song| song.genre_id == id).collect()
    }

    /// Songs for `ids` in the given order. Unknown ids are skipped.
    pub fn songs_by_ids(&self, ids: &[SongId]) -> Vec<&Song> {
        ids.iter().filter_map(|id| self.song(*id)).collect()
    }

    /// Catalog playlists created by `owner`
    pub fn playlists_by_owner(&self, owner: UserId) -> Vec<&Playlist> {
        self.playlists
            .iter()
            .filter(|playlist| playlist.created_by == owner)
            .collect()
    }

    fn songs_in_catalog_order(&self, ids: &[SongId]) -> Vec<&Song> {
        self.songs
            .iter()
            .filter(|song| ids.contains(&song.id))
            .collect()
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Songs whose title, artist or album name contains `query`
    pub fn search_songs(&self, query: &str) -> Vec<&Song> {
        let query = normalize(query);
        self.songs.iter().filter(|song| song.matches(&query)).collect()
    }

    /// Albums whose name or artist contains `query`
    pub fn search_albums(&self, query: &str) -> Vec<&Album> {
        let query = normalize(query);
        self.albums
            .iter()
            .filter(|album| album.matches(&query))
            .collect()
    }

    /// Catalog playlists whose name or description contains `query`
    pub fn search_playlists(&self, query: &str) -> Vec<&Playlist> {
        let query = normalize(query);
        self.playlists
            .iter()
            .filter(|playlist| playlist.matches(&query))
            .collect()
    }

    /// Run all three searches at once
    pub fn search(&self, query: &str) -> SearchResults<'_> {
        SearchResults {
            songs: self.search_songs(query),
            albums: self.search_albums(query),
            playlists: self.search_playlists(query),
        }
    }

    // =========================================================================
    // Presentation helpers
    // =========================================================================

    /// First `limit` catalog playlists, as listed in the sidebar
    pub fn featured_playlists(&self, limit: usize) -> &[Playlist] {
        &self.playlists[..limit.min(self.playlists.len())]
    }

    /// First `limit` genres, as listed in the sidebar
    pub fn featured_genres(&self, limit: usize) -> &[Genre] {
        &self.genres[..limit.min(self.genres.len())]
    }

    /// Cover of the first listed song, or [`DEFAULT_COVER_URL`]
    pub fn cover_for(&self, songs: &[SongId]) -> &str {
        songs
            .first()
            .and_then(|id| self.song(*id))
            .map(|song| song.cover_url.as_str())
            .unwrap_or(DEFAULT_COVER_URL)
    }
}
