//! Domain models for the music library
//!
//! Catalog entities (songs, albums, playlists, genres, users) are immutable
//! once loaded. [`UserPlaylist`] is the only record the user can create and
//! its serialized form is the persisted `userPlaylists` element.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ID Types
// =============================================================================

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Unique identifier for a song
    SongId
);
integer_id!(
    /// Unique identifier for an album
    AlbumId
);
integer_id!(
    /// Unique identifier for a playlist (catalog, user-created or the liked-songs view)
    PlaylistId
);
integer_id!(
    /// Unique identifier for a genre
    GenreId
);
integer_id!(
    /// Unique identifier for a user profile
    UserId
);

/// The single local profile that owns user-created playlists
pub const LOCAL_USER_ID: UserId = UserId(1);

/// Cover shown for a playlist whose first song has no known artwork
pub const DEFAULT_COVER_URL: &str = "/default-cover.png";

/// Lowercase form used for case-insensitive substring search
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
}

// =============================================================================
// Domain Models
// =============================================================================

/// A playable track from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    /// Album name as displayed
    pub album: String,
    pub album_id: AlbumId,
    /// Genre name as displayed
    pub genre: String,
    pub genre_id: GenreId,
    /// Duration in seconds
    pub duration: u32,
    pub audio_url: String,
    pub cover_url: String,
    pub year: i32,
    pub play_count: u64,
}

impl Song {
    /// True when the lowercase `query` is contained in title, artist or album name
    pub fn matches(&self, query: &str) -> bool {
        normalize(&self.title).contains(query)
            || normalize(&self.artist).contains(query)
            || normalize(&self.album).contains(query)
    }
}

/// Album with its ordered song references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub artist: String,
    pub year: i32,
    pub genre: String,
    pub genre_id: GenreId,
    pub cover_url: String,
    /// Weak references; ids missing from the catalog are kept
    pub songs: Vec<SongId>,
    /// Sum of the durations of the album's songs, in seconds.
    /// Recomputed whenever the catalog is loaded.
    #[serde(default)]
    pub total_duration: u64,
}

impl Album {
    pub fn matches(&self, query: &str) -> bool {
        normalize(&self.name).contains(query) || normalize(&self.artist).contains(query)
    }

    /// Validate album data
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("Album {} name cannot be empty", self.id));
        }

        Ok(())
    }
}

/// Playlist as presented to the UI
///
/// Catalog playlists, user playlists and the liked-songs view all take this
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: UserId,
    /// Ordered, duplicate-free song references
    pub songs: Vec<SongId>,
    pub cover_url: String,
    pub is_public: bool,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

impl Playlist {
    /// Case-insensitive match over name and description
    pub fn matches(&self, query: &str) -> bool {
        normalize(&self.name).contains(query)
            || self
                .description
                .as_deref()
                .map(|description| normalize(description).contains(query))
                .unwrap_or(false)
    }

    /// Validate playlist data
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("Playlist {} name cannot be empty", self.id));
        }

        for (index, song) in self.songs.iter().enumerate() {
            if self.songs[..index].contains(song) {
                return Err(format!(
                    "Playlist {} lists song {} more than once",
                    self.id, song
                ));
            }
        }

        if self.updated_at < self.created_at {
            return Err(format!(
                "Playlist {} was updated before it was created",
                self.id
            ));
        }

        Ok(())
    }
}

/// Music genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub description: String,
    /// CSS hex color, e.g. `#E13300`
    pub color: String,
}

/// User profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub playlists: Vec<PlaylistId>,
    pub favorite_songs: Vec<SongId>,
    pub favorite_albums: Vec<AlbumId>,
    pub created_at: NaiveDate,
}

/// User-created playlist as persisted under `userPlaylists`
///
/// Only `id`, `name` and `songs` are required. The optional members are
/// omitted when absent so older `{id, name, songs}` records round-trip
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPlaylist {
    pub id: PlaylistId,
    pub name: String,
    pub songs: Vec<SongId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDate>,
}

impl UserPlaylist {
    /// Create an empty playlist dated `today`
    pub fn new(id: PlaylistId, name: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            songs: Vec::new(),
            description: None,
            created_at: Some(today),
            updated_at: Some(today),
        }
    }

    pub fn contains(&self, song: SongId) -> bool {
        self.songs.contains(&song)
    }

    /// Check the record's song list is duplicate-free and its dates are
    /// ordered. Names are not checked; records keep whatever name they were
    /// created with.
    pub fn validate(&self) -> Result<(), String> {
        for (index, song) in self.songs.iter().enumerate() {
            if self.songs[..index].contains(song) {
                return Err(format!(
                    "Playlist {} lists song {} more than once",
                    self.id, song
                ));
            }
        }

        if let (Some(created), Some(updated)) = (self.created_at, self.updated_at) {
            if updated < created {
                return Err(format!(
                    "Playlist {} was updated before it was created",
                    self.id
                ));
            }
        }

        Ok(())
    }

    /// Present this record as a [`Playlist`].
    ///
    /// Records written without dates are shown as created `today`.
    pub fn to_playlist(&self, cover_url: impl Into<String>, today: NaiveDate) -> Playlist {
        let created_at = self.created_at.unwrap_or(today);
        Playlist {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            created_by: LOCAL_USER_ID,
            songs: self.songs.clone(),
            cover_url: cover_url.into(),
            is_public: false,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}
