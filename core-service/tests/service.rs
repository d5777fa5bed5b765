//! End-to-end behavior of the service façade

use std::sync::Arc;

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{FixedClock, MemorySettingsStore, SettingsStore};
use core_service::{
    Catalog, CoreConfig, CoreError, CoreService, PlaylistId, PlaylistMutation, SongId,
    LIKED_SONGS_PLAYLIST_ID,
};
use mockall::mock;

/// 2024-01-15 12:00:00 UTC
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

fn service_with(settings: Arc<dyn SettingsStore>) -> anyhow::Result<CoreService> {
    let config = CoreConfig::builder()
        .settings_store(settings)
        .clock(Arc::new(FixedClock::from_millis(JAN_15_2024_MILLIS)))
        .build()?;
    Ok(CoreService::new(config, Catalog::builtin()?))
}

fn service() -> anyhow::Result<CoreService> {
    service_with(Arc::new(MemorySettingsStore::new()))
}

fn song_ids(songs: &[&core_service::Song]) -> Vec<i64> {
    songs.iter().map(|song| song.id.get()).collect()
}

#[test]
fn liked_songs_playlist_follows_the_store() -> anyhow::Result<()> {
    let core = service()?;
    assert!(core.liked_songs_playlist().songs.is_empty());

    assert!(core.toggle_like(SongId(4))?);
    assert!(core.toggle_like(SongId(2))?);

    let liked = core.liked_songs_playlist();
    assert_eq!(liked.id, LIKED_SONGS_PLAYLIST_ID);
    assert_eq!(liked.songs, vec![SongId(4), SongId(2)]);
    assert_eq!(liked.created_at.to_string(), "2024-01-15");

    assert!(!core.toggle_like(SongId(4))?);
    assert_eq!(core.liked_songs_playlist().songs, vec![SongId(2)]);
    Ok(())
}

#[test]
fn projection_is_never_persisted() -> anyhow::Result<()> {
    let settings = Arc::new(MemorySettingsStore::new());
    let core = service_with(settings.clone())?;

    core.toggle_like(SongId(1))?;
    core.create_playlist("Mine")?;
    let _ = core.all_playlists();

    let stored = settings.get_string("userPlaylists")?.unwrap_or_default();
    assert!(!stored.contains("999"));
    assert!(!stored.contains("Liked Songs"));
    assert_eq!(settings.list_keys()?, vec!["likedSongs", "userPlaylists"]);
    Ok(())
}

#[test]
fn playlist_resolution_order() -> anyhow::Result<()> {
    let core = service()?;
    let mine = core.create_playlist("Mine")?;
    core.add_song_to_playlist(mine.id, SongId(3))?;

    assert_eq!(core.playlist(LIKED_SONGS_PLAYLIST_ID).unwrap().name, "Liked Songs");
    assert_eq!(core.playlist(PlaylistId(4)).unwrap().name, "Rock Classics");

    let resolved = core.playlist(mine.id).unwrap();
    assert_eq!(resolved.name, "Mine");
    assert_eq!(resolved.cover_url, "/default-cover3.png");

    assert!(core.playlist(PlaylistId(77)).is_none());
    Ok(())
}

#[test]
fn all_playlists_starts_with_liked_songs() -> anyhow::Result<()> {
    let core = service()?;
    let ids: Vec<i64> = core.all_playlists().iter().map(|p| p.id.get()).collect();
    assert_eq!(ids, vec![999, 1, 2, 3, 4, 5, 6]);
    Ok(())
}

#[test]
fn songs_by_playlist_order_depends_on_source() -> anyhow::Result<()> {
    let core = service()?;

    // Catalog playlist: catalog order
    assert_eq!(song_ids(&core.songs_by_playlist(PlaylistId(5))), vec![6, 7, 1]);

    // Liked songs: like order
    core.toggle_like(SongId(1))?;
    core.toggle_like(SongId(6))?;
    assert_eq!(
        song_ids(&core.songs_by_playlist(LIKED_SONGS_PLAYLIST_ID)),
        vec![1, 6]
    );

    // User playlist: stored order, unknown songs skipped
    let mine = core
        .store()
        .create_playlist_with_songs("Mine", &[SongId(5), SongId(42), SongId(2)])?;
    assert_eq!(song_ids(&core.songs_by_playlist(mine.id)), vec![5, 2]);

    assert!(core.songs_by_playlist(PlaylistId(77)).is_empty());
    Ok(())
}

#[test]
fn liked_songs_cannot_be_edited_as_a_playlist() -> anyhow::Result<()> {
    let settings = Arc::new(MemorySettingsStore::new());
    let core = service_with(settings.clone())?;

    assert_eq!(
        core.add_song_to_playlist(LIKED_SONGS_PLAYLIST_ID, SongId(1))?,
        PlaylistMutation::NotFound
    );
    assert_eq!(
        core.remove_song_from_playlist(LIKED_SONGS_PLAYLIST_ID, SongId(1))?,
        PlaylistMutation::NotFound
    );
    assert!(!core.delete_playlist(LIKED_SONGS_PLAYLIST_ID)?);

    assert!(!core.is_song_liked(SongId(1)));
    assert!(settings.list_keys()?.is_empty());
    Ok(())
}

#[test]
fn catalog_playlists_are_read_only() -> anyhow::Result<()> {
    let core = service()?;
    assert_eq!(
        core.add_song_to_playlist(PlaylistId(1), SongId(11))?,
        PlaylistMutation::NotFound
    );
    assert_eq!(core.catalog().playlist(PlaylistId(1)).unwrap().songs.len(), 5);
    Ok(())
}

#[test]
fn search_playlists_spans_every_source() -> anyhow::Result<()> {
    let core = service()?;
    core.create_playlist("Favorite Mornings")?;

    let names: Vec<String> = core
        .search_playlists("FAVORITE")
        .into_iter()
        .map(|playlist| playlist.name)
        .collect();
    assert_eq!(names, vec!["Liked Songs", "Favorite Mornings"]);

    // Empty query: liked songs, six catalog playlists, one user playlist
    assert_eq!(core.search_playlists("").len(), 8);
    Ok(())
}

#[test]
fn user_playlists_view() -> anyhow::Result<()> {
    let core = service()?;
    assert!(core.user_playlists().is_empty());

    let empty = core.create_playlist("Empty")?;
    let views = core.user_playlists();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].id, empty.id);
    assert_eq!(views[0].cover_url, "/default-cover.png");
    assert!(!views[0].is_public);
    Ok(())
}

#[test]
fn write_failures_surface_as_library_errors() -> anyhow::Result<()> {
    let mut settings = MockSettings::new();
    settings.expect_get_string().returning(|_| Ok(None));
    settings
        .expect_set_string()
        .returning(|_, _| Err(BridgeError::OperationFailed("quota exceeded".to_string())));

    let core = service_with(Arc::new(settings))?;

    let err = core.toggle_like(SongId(1)).unwrap_err();
    assert!(matches!(err, CoreError::Library(_)));
    assert!(err.to_string().contains("quota exceeded"));
    assert!(!core.is_song_liked(SongId(1)));
    Ok(())
}

#[test]
fn unreadable_store_degrades_to_empty_views() -> anyhow::Result<()> {
    let mut settings = MockSettings::new();
    settings
        .expect_get_string()
        .returning(|_| Err(BridgeError::NotAvailable("localStorage".to_string())));

    let core = service_with(Arc::new(settings))?;

    assert!(core.liked_songs_playlist().songs.is_empty());
    assert!(core.user_playlists().is_empty());
    assert_eq!(core.all_playlists().len(), 7);
    Ok(())
}

#[test]
fn from_config_loads_catalog_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"{
            "songs": [{
                "id": 1, "title": "Solo", "artist": "Someone", "album": "Alone",
                "albumId": 1, "genre": "Pop", "genreId": 1, "duration": 120,
                "audioUrl": "/audio/solo.mp3", "coverUrl": "/solo.png",
                "year": 2024, "playCount": 0
            }]
        }"#,
    )?;

    let config = CoreConfig::builder()
        .settings_store(Arc::new(MemorySettingsStore::new()))
        .catalog_path(&path)
        .build()?;
    let core = CoreService::from_config(config)?;

    assert_eq!(core.catalog().songs().len(), 1);
    assert!(core.catalog().playlists().is_empty());
    assert_eq!(core.all_playlists().len(), 1);
    Ok(())
}

#[test]
fn from_config_rejects_missing_catalog_file() -> anyhow::Result<()> {
    let config = CoreConfig::builder()
        .settings_store(Arc::new(MemorySettingsStore::new()))
        .catalog_path("/nowhere/catalog.json")
        .build()?;

    let result = CoreService::from_config(config);
    assert!(matches!(result, Err(CoreError::Library(_))));
    Ok(())
}

#[test]
fn clones_share_state() -> anyhow::Result<()> {
    let core = service()?;
    let other = core.clone();

    core.toggle_like(SongId(9))?;
    assert!(other.is_song_liked(SongId(9)));
    Ok(())
}

#[cfg(feature = "desktop-shims")]
#[test]
fn desktop_settings_survive_restart() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let settings_path = dir.path().join("settings.json");

    let build = || -> anyhow::Result<CoreService> {
        let config = CoreConfig::builder()
            .storage_path(&settings_path)
            .clock(Arc::new(FixedClock::from_millis(JAN_15_2024_MILLIS)))
            .build()?;
        Ok(core_service::bootstrap(config)?)
    };

    let first = build()?;
    first.toggle_like(SongId(5))?;
    let created = first.create_playlist("Kept")?;

    let second = build()?;
    assert!(second.is_song_liked(SongId(5)));
    assert_eq!(second.playlist(created.id).map(|p| p.name), Some("Kept".to_string()));
    Ok(())
}
