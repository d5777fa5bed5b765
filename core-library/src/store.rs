//! # Library Store
//!
//! Durable liked songs and user playlists on top of a [`SettingsStore`].
//!
//! ## Persisted layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `likedSongs` | JSON array of song ids, insertion order, e.g. `[1,3,7]` |
//! | `userPlaylists` | JSON array of [`UserPlaylist`] records |
//!
//! ## Failure policy
//!
//! Reads fail open: a missing key, an unreadable medium or a payload that does
//! not match the schema all read as an empty collection (logged at `warn`).
//! A single bad element invalidates the whole collection, and so does a
//! payload that parses but breaks a collection rule: a song liked twice, a
//! playlist listing a song twice, two playlists sharing an id, or a stored
//! playlist using the reserved liked-songs id.
//!
//! Writes surface [`LibraryError::Bridge`] so callers can report a full or
//! unavailable medium. Unknown playlist ids are never errors; they yield
//! [`PlaylistMutation::NotFound`].
//!
//! ## Concurrency
//!
//! Every operation reads the collection, changes it and writes it back whole.
//! Two stores sharing one medium (e.g. two browser tabs) are not coordinated:
//! each sees the other's writes on its next read, and overlapping
//! read-modify-write cycles are last-write-wins.

use crate::error::{LibraryError, Result};
use crate::models::{PlaylistId, SongId, UserPlaylist};
use crate::projection::LIKED_SONGS_PLAYLIST_ID;
use bridge_traits::{Clock, SettingsStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key of the liked song id list
pub const LIKED_SONGS_KEY: &str = "likedSongs";

/// Storage key of the user playlist collection
pub const USER_PLAYLISTS_KEY: &str = "userPlaylists";

/// Outcome of a change aimed at one user playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaylistMutation {
    /// The playlist changed
    Applied,
    /// The playlist exists but already had the requested state
    Unchanged,
    /// No user playlist has this id
    NotFound,
}

impl PlaylistMutation {
    /// Whether the playlist was actually changed
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Liked songs and user playlists persisted through a [`SettingsStore`]
pub struct LibraryStore {
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    /// Highest playlist id issued by this instance
    last_issued_id: AtomicI64,
}

impl LibraryStore {
    pub fn new(settings: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings,
            clock,
            last_issued_id: AtomicI64::new(0),
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // =========================================================================
    // Liked songs
    // =========================================================================

    /// Liked song ids in the order they were liked
    pub fn liked_songs(&self) -> Vec<SongId> {
        self.read_collection(LIKED_SONGS_KEY, validate_liked_songs)
    }

    pub fn is_song_liked(&self, song: SongId) -> bool {
        self.liked_songs().contains(&song)
    }

    /// Append `song` to the liked set. Already-liked songs are left alone and
    /// nothing is written.
    pub fn like_song(&self, song: SongId) -> Result<()> {
        let mut liked = self.liked_songs();
        if liked.contains(&song) {
            return Ok(());
        }

        liked.push(song);
        self.write_collection(LIKED_SONGS_KEY, &liked)?;
        debug!(song_id = %song, "Liked song");
        Ok(())
    }

    /// Remove `song` from the liked set. The set is written back even when
    /// the song was not liked.
    pub fn unlike_song(&self, song: SongId) -> Result<()> {
        let mut liked = self.liked_songs();
        liked.retain(|id| *id != song);
        self.write_collection(LIKED_SONGS_KEY, &liked)?;
        debug!(song_id = %song, "Unliked song");
        Ok(())
    }

    // =========================================================================
    // User playlists
    // =========================================================================

    /// User playlists in creation order
    pub fn user_playlists(&self) -> Vec<UserPlaylist> {
        self.read_collection(USER_PLAYLISTS_KEY, validate_user_playlists)
    }

    pub fn user_playlist(&self, id: PlaylistId) -> Option<UserPlaylist> {
        self.user_playlists()
            .into_iter()
            .find(|playlist| playlist.id == id)
    }

    /// Replace the whole collection with `playlists`.
    ///
    /// A collection that would not read back (duplicate ids, duplicate songs,
    /// the reserved liked-songs id) is rejected with
    /// [`LibraryError::InvalidInput`] and nothing is written.
    pub fn save_user_playlists(&self, playlists: &[UserPlaylist]) -> Result<()> {
        validate_user_playlists(playlists).map_err(|message| LibraryError::InvalidInput {
            field: "playlists".to_string(),
            message,
        })?;
        self.write_collection(USER_PLAYLISTS_KEY, playlists)
    }

    /// Create and persist an empty playlist called `name`.
    ///
    /// The name is stored as given.
    pub fn create_playlist(&self, name: impl Into<String>) -> Result<UserPlaylist> {
        self.insert_playlist(name.into(), Vec::new())
    }

    /// Create a playlist that starts with `songs`.
    ///
    /// The name is trimmed and must not be blank. Repeated songs keep their
    /// first position.
    pub fn create_playlist_with_songs(
        &self,
        name: &str,
        songs: &[SongId],
    ) -> Result<UserPlaylist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::InvalidInput {
                field: "name".to_string(),
                message: "Playlist name cannot be empty".to_string(),
            });
        }

        let mut unique = Vec::with_capacity(songs.len());
        for song in songs {
            if !unique.contains(song) {
                unique.push(*song);
            }
        }

        self.insert_playlist(name.to_string(), unique)
    }

    fn insert_playlist(&self, name: String, songs: Vec<SongId>) -> Result<UserPlaylist> {
        let mut playlists = self.user_playlists();
        let id = self.next_playlist_id(&playlists);

        let mut playlist = UserPlaylist::new(id, name, self.clock.today());
        playlist.songs = songs;

        playlists.push(playlist.clone());
        self.write_collection(USER_PLAYLISTS_KEY, &playlists)?;

        debug!(playlist_id = %id, songs = playlist.songs.len(), "Created playlist");
        Ok(playlist)
    }

    /// Append `song` unless the playlist already holds it. Writes only when
    /// the song was added.
    pub fn add_song_to_playlist(
        &self,
        playlist: PlaylistId,
        song: SongId,
    ) -> Result<PlaylistMutation> {
        self.update_playlist(playlist, false, |record| {
            if record.contains(song) {
                return false;
            }
            record.songs.push(song);
            true
        })
    }

    /// Remove every occurrence of `song`. The collection is written back
    /// whenever the playlist exists.
    pub fn remove_song_from_playlist(
        &self,
        playlist: PlaylistId,
        song: SongId,
    ) -> Result<PlaylistMutation> {
        self.update_playlist(playlist, true, |record| {
            let before = record.songs.len();
            record.songs.retain(|id| *id != song);
            record.songs.len() != before
        })
    }

    pub fn rename_playlist(
        &self,
        playlist: PlaylistId,
        name: impl Into<String>,
    ) -> Result<PlaylistMutation> {
        let name = name.into();
        self.update_playlist(playlist, false, |record| {
            if record.name == name {
                return false;
            }
            record.name = name;
            true
        })
    }

    pub fn set_playlist_description(
        &self,
        playlist: PlaylistId,
        description: Option<String>,
    ) -> Result<PlaylistMutation> {
        self.update_playlist(playlist, false, |record| {
            if record.description == description {
                return false;
            }
            record.description = description;
            true
        })
    }

    /// Delete a playlist. Returns whether one was removed; the collection is
    /// written back either way.
    pub fn delete_playlist(&self, playlist: PlaylistId) -> Result<bool> {
        let mut playlists = self.user_playlists();
        let before = playlists.len();
        playlists.retain(|record| record.id != playlist);
        let removed = playlists.len() != before;

        self.write_collection(USER_PLAYLISTS_KEY, &playlists)?;
        debug!(playlist_id = %playlist, removed, "Deleted playlist");
        Ok(removed)
    }

    /// Forget liked songs and user playlists
    pub fn clear(&self) -> Result<()> {
        self.settings.delete(LIKED_SONGS_KEY)?;
        self.settings.delete(USER_PLAYLISTS_KEY)?;
        debug!("Cleared library store");
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn update_playlist<F>(
        &self,
        id: PlaylistId,
        write_unchanged: bool,
        change: F,
    ) -> Result<PlaylistMutation>
    where
        F: FnOnce(&mut UserPlaylist) -> bool,
    {
        let mut playlists = self.user_playlists();
        let Some(record) = playlists.iter_mut().find(|record| record.id == id) else {
            debug!(playlist_id = %id, "Playlist not found, ignoring change");
            return Ok(PlaylistMutation::NotFound);
        };

        let changed = change(record);
        if changed {
            record.updated_at = Some(self.clock.today());
        }

        if changed || write_unchanged {
            self.write_collection(USER_PLAYLISTS_KEY, &playlists)?;
        }

        Ok(if changed {
            PlaylistMutation::Applied
        } else {
            PlaylistMutation::Unchanged
        })
    }

    /// Next playlist id: the current time in milliseconds, bumped past every
    /// existing user playlist, the reserved liked-songs id and every id this
    /// instance has already issued.
    ///
    /// Once stored ids reach `i64::MAX` there is nothing left above them, so
    /// the lowest free id above the reserved one is used instead.
    fn next_playlist_id(&self, existing: &[UserPlaylist]) -> PlaylistId {
        let floor = existing
            .iter()
            .map(|playlist| playlist.id.get())
            .chain(std::iter::once(LIKED_SONGS_PLAYLIST_ID.get()))
            .max()
            .unwrap_or(LIKED_SONGS_PLAYLIST_ID.get())
            .saturating_add(1);
        let candidate = self.clock.unix_timestamp_millis().max(floor);

        let previous = match self.last_issued_id.fetch_update(
            Ordering::SeqCst,
            Ordering::SeqCst,
            |last| Some(candidate.max(last.saturating_add(1))),
        ) {
            Ok(previous) | Err(previous) => previous,
        };

        let id = candidate.max(previous.saturating_add(1));
        let taken = |id: i64| existing.iter().any(|playlist| playlist.id.get() == id);
        if !taken(id) {
            return PlaylistId(id);
        }

        let free = (LIKED_SONGS_PLAYLIST_ID.get() + 1..=i64::MAX)
            .find(|id| !taken(*id))
            .unwrap_or(i64::MAX);
        warn!(playlist_id = free, "Playlist ids exhausted above stored records, reusing a free id");
        PlaylistId(free)
    }

    fn read_collection<T: DeserializeOwned>(
        &self,
        key: &str,
        validate: fn(&[T]) -> std::result::Result<(), String>,
    ) -> Vec<T> {
        let raw = match self.settings.get_string(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key, error = %err, "Failed to read stored collection, treating as empty");
                return Vec::new();
            }
        };

        let items: Vec<T> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                warn!(key, error = %err, "Stored collection is malformed, treating as empty");
                return Vec::new();
            }
        };

        match validate(&items) {
            Ok(()) => items,
            Err(reason) => {
                warn!(key, %reason, "Stored collection is invalid, treating as empty");
                Vec::new()
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let encoded = serde_json::to_string(items)?;
        self.settings.set_string(key, &encoded).map_err(|err| {
            warn!(key, error = %err, "Failed to persist collection");
            LibraryError::from(err)
        })?;
        debug!(key, count = items.len(), "Persisted collection");
        Ok(())
    }
}

fn validate_liked_songs(liked: &[SongId]) -> std::result::Result<(), String> {
    for (index, song) in liked.iter().enumerate() {
        if liked[..index].contains(song) {
            return Err(format!("song {} is liked more than once", song));
        }
    }
    Ok(())
}

fn validate_user_playlists(playlists: &[UserPlaylist]) -> std::result::Result<(), String> {
    for (index, playlist) in playlists.iter().enumerate() {
        if playlist.id == LIKED_SONGS_PLAYLIST_ID {
            return Err(format!(
                "playlist id {} is reserved for liked songs",
                LIKED_SONGS_PLAYLIST_ID
            ));
        }
        if playlists[..index].iter().any(|other| other.id == playlist.id) {
            return Err(format!("playlist id {} is used more than once", playlist.id));
        }
        playlist.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::{FixedClock, MemorySettingsStore};
    use chrono::{Duration, NaiveDate};
    use mockall::mock;

    const JAN_15_2024_MILLIS: i64 = 1_705_320_000_000;

    mock! {
        pub Settings {}

        impl SettingsStore for Settings {
            fn get_string(&self, key: &str) -> BridgeResult<Option<String>>;
            fn set_string(&self, key: &str, value: &str) -> BridgeResult<()>;
            fn delete(&self, key: &str) -> BridgeResult<()>;
            fn has_key(&self, key: &str) -> BridgeResult<bool>;
            fn list_keys(&self) -> BridgeResult<Vec<String>>;
            fn clear_all(&self) -> BridgeResult<()>;
        }
    }

    fn setup() -> (LibraryStore, Arc<MemorySettingsStore>, Arc<FixedClock>) {
        let settings = Arc::new(MemorySettingsStore::new());
        let clock = Arc::new(FixedClock::from_millis(JAN_15_2024_MILLIS));
        let store = LibraryStore::new(settings.clone(), clock.clone());
        (store, settings, clock)
    }

    fn with_mock(settings: MockSettings) -> LibraryStore {
        LibraryStore::new(
            Arc::new(settings),
            Arc::new(FixedClock::from_millis(JAN_15_2024_MILLIS)),
        )
    }

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_like_and_unlike() {
        let (store, settings, _) = setup();

        store.like_song(SongId(3)).unwrap();
        store.like_song(SongId(1)).unwrap();
        assert!(store.is_song_liked(SongId(3)));
        assert_eq!(store.liked_songs(), vec![SongId(3), SongId(1)]);
        assert_eq!(
            settings.get_string(LIKED_SONGS_KEY).unwrap().as_deref(),
            Some("[3,1]")
        );

        store.unlike_song(SongId(3)).unwrap();
        assert!(!store.is_song_liked(SongId(3)));
        assert_eq!(store.liked_songs(), vec![SongId(1)]);
    }

    #[test]
    fn test_like_is_idempotent() {
        let (store, _, _) = setup();
        store.like_song(SongId(7)).unwrap();
        store.like_song(SongId(7)).unwrap();
        assert_eq!(store.liked_songs(), vec![SongId(7)]);
    }

    #[test]
    fn test_unlike_writes_even_without_change() {
        let (store, settings, _) = setup();
        assert!(!settings.has_key(LIKED_SONGS_KEY).unwrap());

        store.unlike_song(SongId(4)).unwrap();
        assert_eq!(
            settings.get_string(LIKED_SONGS_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_malformed_payloads_read_as_empty() {
        let settings = Arc::new(MemorySettingsStore::with_entries([
            (LIKED_SONGS_KEY, "{not json"),
            (USER_PLAYLISTS_KEY, r#"[{"id":1,"name":"A","songs":[1]},{"id":"x"}]"#),
        ]));
        let store = LibraryStore::new(settings, Arc::new(FixedClock::from_millis(0)));

        assert!(store.liked_songs().is_empty());
        assert!(store.user_playlists().is_empty());
    }

    #[test]
    fn test_wrong_shapes_read_as_empty() {
        let settings = Arc::new(MemorySettingsStore::with_entries([
            (LIKED_SONGS_KEY, r#"{"1":true}"#),
            (USER_PLAYLISTS_KEY, "null"),
        ]));
        let store = LibraryStore::new(settings, Arc::new(FixedClock::from_millis(0)));

        assert!(store.liked_songs().is_empty());
        assert!(store.user_playlists().is_empty());
    }

    #[test]
    fn test_like_after_malformed_payload_replaces_it() {
        let settings = Arc::new(MemorySettingsStore::with_entries([(
            LIKED_SONGS_KEY,
            "[1, \"two\"]",
        )]));
        let store = LibraryStore::new(settings, Arc::new(FixedClock::from_millis(0)));

        store.like_song(SongId(2)).unwrap();
        assert_eq!(store.liked_songs(), vec![SongId(2)]);
    }

    #[test]
    fn test_create_playlist() {
        let (store, _, _) = setup();

        let playlist = store.create_playlist("Road Trip").unwrap();
        assert_eq!(playlist.id, PlaylistId(JAN_15_2024_MILLIS));
        assert_eq!(playlist.name, "Road Trip");
        assert!(playlist.songs.is_empty());
        assert_eq!(playlist.created_at, Some(jan(15)));

        assert_eq!(store.user_playlists(), vec![playlist]);
    }

    #[test]
    fn test_ids_increase_under_frozen_clock() {
        let (store, _, _) = setup();

        let first = store.create_playlist("One").unwrap();
        let second = store.create_playlist("Two").unwrap();
        let third = store.create_playlist("Three").unwrap();

        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[test]
    fn test_ids_skip_past_existing_records() {
        let settings = Arc::new(MemorySettingsStore::with_entries([(
            USER_PLAYLISTS_KEY,
            r#"[{"id":5000000000000,"name":"Future","songs":[]}]"#,
        )]));
        let store = LibraryStore::new(
            settings,
            Arc::new(FixedClock::from_millis(JAN_15_2024_MILLIS)),
        );

        let created = store.create_playlist("Next").unwrap();
        assert_eq!(created.id, PlaylistId(5_000_000_000_001));
    }

    #[test]
    fn test_ids_never_collide_with_reserved_id() {
        let settings = Arc::new(MemorySettingsStore::new());
        let store = LibraryStore::new(settings, Arc::new(FixedClock::from_millis(0)));

        let created = store.create_playlist("Epoch").unwrap();
        assert!(created.id > LIKED_SONGS_PLAYLIST_ID);
    }

    #[test]
    fn test_create_playlist_with_songs() {
        let (store, _, _) = setup();

        let playlist = store
            .create_playlist_with_songs("  Mix  ", &[SongId(2), SongId(5), SongId(2)])
            .unwrap();
        assert_eq!(playlist.name, "Mix");
        assert_eq!(playlist.songs, vec![SongId(2), SongId(5)]);

        let err = store.create_playlist_with_songs("   ", &[SongId(1)]).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidInput { .. }));
        assert_eq!(store.user_playlists().len(), 1);
    }

    #[test]
    fn test_add_and_remove_song() {
        let (store, _, clock) = setup();
        let playlist = store.create_playlist("Gym").unwrap();
        clock.advance(Duration::days(2));

        assert_eq!(
            store.add_song_to_playlist(playlist.id, SongId(5)).unwrap(),
            PlaylistMutation::Applied
        );
        assert_eq!(
            store.add_song_to_playlist(playlist.id, SongId(5)).unwrap(),
            PlaylistMutation::Unchanged
        );

        let stored = store.user_playlist(playlist.id).unwrap();
        assert_eq!(stored.songs, vec![SongId(5)]);
        assert_eq!(stored.created_at, Some(jan(15)));
        assert_eq!(stored.updated_at, Some(jan(17)));

        assert_eq!(
            store.remove_song_from_playlist(playlist.id, SongId(5)).unwrap(),
            PlaylistMutation::Applied
        );
        assert_eq!(
            store.remove_song_from_playlist(playlist.id, SongId(5)).unwrap(),
            PlaylistMutation::Unchanged
        );
        assert!(store.user_playlist(playlist.id).unwrap().songs.is_empty());
    }

    #[test]
    fn test_unknown_playlist_is_not_found() {
        let (store, settings, _) = setup();

        assert_eq!(
            store.add_song_to_playlist(PlaylistId(1), SongId(1)).unwrap(),
            PlaylistMutation::NotFound
        );
        assert_eq!(
            store
                .remove_song_from_playlist(LIKED_SONGS_PLAYLIST_ID, SongId(1))
                .unwrap(),
            PlaylistMutation::NotFound
        );
        assert_eq!(
            store.rename_playlist(PlaylistId(1), "x").unwrap(),
            PlaylistMutation::NotFound
        );
        assert!(!settings.has_key(USER_PLAYLISTS_KEY).unwrap());
    }

    #[test]
    fn test_rename_and_describe() {
        let (store, _, _) = setup();
        let playlist = store.create_playlist("Draft").unwrap();

        assert!(store
            .rename_playlist(playlist.id, "Final")
            .unwrap()
            .is_applied());
        assert_eq!(
            store.rename_playlist(playlist.id, "Final").unwrap(),
            PlaylistMutation::Unchanged
        );
        assert!(store
            .set_playlist_description(playlist.id, Some("Late night".to_string()))
            .unwrap()
            .is_applied());

        let stored = store.user_playlist(playlist.id).unwrap();
        assert_eq!(stored.name, "Final");
        assert_eq!(stored.description.as_deref(), Some("Late night"));
    }

    #[test]
    fn test_delete_playlist() {
        let (store, _, _) = setup();
        let keep = store.create_playlist("Keep").unwrap();
        let drop = store.create_playlist("Drop").unwrap();

        assert!(store.delete_playlist(drop.id).unwrap());
        assert!(!store.delete_playlist(drop.id).unwrap());
        assert_eq!(store.user_playlists(), vec![keep]);
    }

    #[test]
    fn test_save_user_playlists_overwrites() {
        let (store, _, _) = setup();
        store.create_playlist("Old").unwrap();

        let replacement = UserPlaylist::new(PlaylistId(1234), "New", jan(1));
        store.save_user_playlists(&[replacement.clone()]).unwrap();

        assert_eq!(store.user_playlists(), vec![replacement]);
    }

    #[test]
    fn test_legacy_records_are_preserved() {
        let raw = r#"[{"id":1700000000000,"name":"Legacy","songs":[1,2]}]"#;
        let settings = Arc::new(MemorySettingsStore::with_entries([(USER_PLAYLISTS_KEY, raw)]));
        let store = LibraryStore::new(
            settings.clone(),
            Arc::new(FixedClock::from_millis(JAN_15_2024_MILLIS)),
        );

        store
            .remove_song_from_playlist(PlaylistId(1_700_000_000_000), SongId(9))
            .unwrap();

        // Unchanged record is written back without gaining optional members
        assert_eq!(
            settings.get_string(USER_PLAYLISTS_KEY).unwrap().as_deref(),
            Some(r#"[{"id":1700000000000,"name":"Legacy","songs":[1,2]}]"#)
        );
    }

    #[test]
    fn test_clear() {
        let (store, settings, _) = setup();
        store.like_song(SongId(1)).unwrap();
        store.create_playlist("Temp").unwrap();

        store.clear().unwrap();
        assert!(store.liked_songs().is_empty());
        assert!(store.user_playlists().is_empty());
        assert!(settings.list_keys().unwrap().is_empty());
    }

    #[test]
    fn test_read_failure_fails_open() {
        let mut settings = MockSettings::new();
        settings
            .expect_get_string()
            .returning(|_| Err(BridgeError::NotAvailable("localStorage".to_string())));

        let store = with_mock(settings);
        assert!(store.liked_songs().is_empty());
        assert!(!store.is_song_liked(SongId(1)));
        assert!(store.user_playlists().is_empty());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut settings = MockSettings::new();
        settings.expect_get_string().returning(|_| Ok(None));
        settings
            .expect_set_string()
            .times(1)
            .returning(|_, _| Err(BridgeError::OperationFailed("quota exceeded".to_string())));

        let store = with_mock(settings);
        let err = store.like_song(SongId(1)).unwrap_err();
        assert!(matches!(err, LibraryError::Bridge(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_like_existing_song_does_not_write() {
        let mut settings = MockSettings::new();
        settings
            .expect_get_string()
            .returning(|_| Ok(Some("[3]".to_string())));
        settings.expect_set_string().times(0);

        let store = with_mock(settings);
        store.like_song(SongId(3)).unwrap();
    }

    #[test]
    fn test_add_existing_song_does_not_write() {
        let mut settings = MockSettings::new();
        settings
            .expect_get_string()
            .returning(|_| Ok(Some(r#"[{"id":1000,"name":"A","songs":[4]}]"#.to_string())));
        settings.expect_set_string().times(0);

        let store = with_mock(settings);
        assert_eq!(
            store.add_song_to_playlist(PlaylistId(1000), SongId(4)).unwrap(),
            PlaylistMutation::Unchanged
        );
    }

    #[test]
    fn test_delete_missing_playlist_still_writes() {
        let mut settings = MockSettings::new();
        settings.expect_get_string().returning(|_| Ok(None));
        settings
            .expect_set_string()
            .times(1)
            .returning(|_, _| Ok(()));

        let store = with_mock(settings);
        assert!(!store.delete_playlist(PlaylistId(1000)).unwrap());
    }

    #[test]
    fn test_ids_at_top_of_range_do_not_overflow() {
        let settings = Arc::new(MemorySettingsStore::with_entries([(
            USER_PLAYLISTS_KEY,
            r#"[{"id":9223372036854775807,"name":"X","songs":[]}]"#,
        )]));
        let store = LibraryStore::new(
            settings,
            Arc::new(FixedClock::from_millis(JAN_15_2024_MILLIS)),
        );

        let first = store.create_playlist("Y").unwrap();
        let second = store.create_playlist("Z").unwrap();
        assert_ne!(first.id, PlaylistId(i64::MAX));
        assert_ne!(first.id, second.id);
        assert!(first.id > LIKED_SONGS_PLAYLIST_ID);
        assert!(second.id > LIKED_SONGS_PLAYLIST_ID);
        assert_eq!(store.user_playlists().len(), 3);
    }

    #[test]
    fn test_repeated_liked_ids_read_as_empty() {
        let settings = Arc::new(MemorySettingsStore::with_entries([(
            LIKED_SONGS_KEY,
            "[1,1,2]",
        )]));
        let store = LibraryStore::new(settings, Arc::new(FixedClock::from_millis(0)));

        assert!(store.liked_songs().is_empty());
        assert!(!store.is_song_liked(SongId(1)));
    }

    #[test]
    fn test_repeated_playlist_songs_read_as_empty() {
        let settings = Arc::new(MemorySettingsStore::with_entries([(
            USER_PLAYLISTS_KEY,
            r#"[{"id":2000,"name":"A","songs":[5,5]}]"#,
        )]));
        let store = LibraryStore::new(settings, Arc::new(FixedClock::from_millis(0)));

        assert!(store.user_playlists().is_empty());
    }

    #[test]
    fn test_repeated_playlist_ids_read_as_empty() {
        let settings = Arc::new(MemorySettingsStore::with_entries([(
            USER_PLAYLISTS_KEY,
            r#"[{"id":2000,"name":"A","songs":[]},{"id":2000,"name":"B","songs":[]}]"#,
        )]));
        let store = LibraryStore::new(settings, Arc::new(FixedClock::from_millis(0)));

        assert!(store.user_playlists().is_empty());
    }

    #[test]
    fn test_stored_reserved_id_reads_as_empty() {
        let settings = Arc::new(MemorySettingsStore::with_entries([(
            USER_PLAYLISTS_KEY,
            r#"[{"id":999,"name":"Fake","songs":[5]}]"#,
        )]));
        let store = LibraryStore::new(settings, Arc::new(FixedClock::from_millis(0)));

        assert!(store.user_playlists().is_empty());
        assert_eq!(
            store
                .add_song_to_playlist(LIKED_SONGS_PLAYLIST_ID, SongId(5))
                .unwrap(),
            PlaylistMutation::NotFound
        );
    }

    #[test]
    fn test_save_rejects_invalid_collections() {
        let (store, settings, _) = setup();
        store.create_playlist("Kept").unwrap();
        let before = settings.get_string(USER_PLAYLISTS_KEY).unwrap();

        let reserved = UserPlaylist::new(LIKED_SONGS_PLAYLIST_ID, "Liked", jan(1));
        let twin = UserPlaylist::new(PlaylistId(1234), "Twin", jan(1));
        let mut repeated = UserPlaylist::new(PlaylistId(1235), "Repeat", jan(1));
        repeated.songs = vec![SongId(3), SongId(3)];

        for invalid in [
            vec![reserved],
            vec![twin.clone(), twin],
            vec![repeated],
        ] {
            let err = store.save_user_playlists(&invalid).unwrap_err();
            assert!(matches!(err, LibraryError::InvalidInput { .. }));
        }

        assert_eq!(settings.get_string(USER_PLAYLISTS_KEY).unwrap(), before);
    }
}
