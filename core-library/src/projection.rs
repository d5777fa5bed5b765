//! Liked Songs view
//!
//! The liked-songs playlist is derived from the persisted liked set every
//! time it is requested. It is never written anywhere, so it cannot drift
//! from the set it presents.

use crate::models::{Playlist, PlaylistId, SongId, LOCAL_USER_ID};
use chrono::NaiveDate;

/// Identifier reserved for the liked-songs view
pub const LIKED_SONGS_PLAYLIST_ID: PlaylistId = PlaylistId(999);

pub const LIKED_SONGS_NAME: &str = "Liked Songs";
pub const LIKED_SONGS_DESCRIPTION: &str = "Your favorite tracks.";
pub const LIKED_SONGS_COVER_URL: &str = "/default-cover1.png";

/// Present `liked` as a private playlist dated `today`.
///
/// Song order is the order in which songs were liked.
pub fn liked_songs_playlist(liked: &[SongId], today: NaiveDate) -> Playlist {
    Playlist {
        id: LIKED_SONGS_PLAYLIST_ID,
        name: LIKED_SONGS_NAME.to_string(),
        description: Some(LIKED_SONGS_DESCRIPTION.to_string()),
        created_by: LOCAL_USER_ID,
        songs: liked.to_vec(),
        cover_url: LIKED_SONGS_COVER_URL.to_string(),
        is_public: false,
        created_at: today,
        updated_at: today,
    }
}

/// Whether `id` names the liked-songs view rather than a real playlist
pub fn is_reserved_playlist(id: PlaylistId) -> bool {
    id == LIKED_SONGS_PLAYLIST_ID
}
