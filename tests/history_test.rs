use sptrackcli::management::{HistoryBook, HistoryManager, SaveOutcome};
use sptrackcli::types::NowPlaying;

// Helper to build a playback observation for a given track
fn observation(timestamp: &str, track: &str, genres: &[&str]) -> NowPlaying {
    NowPlaying {
        timestamp: timestamp.to_string(),
        track_name: track.to_string(),
        track_id: format!("{}_id", track),
        track_url: format!("https://open.spotify.com/track/{}", track),
        album_name: format!("{} Album", track),
        album_id: format!("{}_album_id", track),
        artist_name: "Artist A, Artist B".to_string(),
        artist_id: "artist_a_id, artist_b_id".to_string(),
        progress_ms: Some(30_000),
        track_image: Some("https://i.scdn.co/image/track".to_string()),
        album_image: Some("https://i.scdn.co/image/album".to_string()),
        artist_image: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

#[test]
fn test_merge_appends_one_play_row() {
    let mut book = HistoryBook::new();

    assert!(book.merge(&observation("2024-03-01 10:00:00", "SongA", &["rock"])));

    assert_eq!(book.plays.len(), 1);
    assert_eq!(book.tracks.len(), 1);
    assert_eq!(book.albums.len(), 1);
    assert_eq!(book.artists.len(), 1);
    assert_eq!(book.plays[0].timestamp, "2024-03-01 10:00:00");
    assert_eq!(book.plays[0].track_id, "SongA_id");
    assert_eq!(book.plays[0].genres, "rock");
}

#[test]
fn test_merge_deduplicates_primary_keys() {
    let mut book = HistoryBook::new();

    book.merge(&observation("2024-03-01 10:00:00", "SongA", &[]));
    book.merge(&observation("2024-03-01 10:03:30", "SongA", &[]));
    book.merge(&observation("2024-03-01 10:07:00", "SongA", &[]));

    // A replayed track appends a play row but never a second metadata row
    assert_eq!(book.plays.len(), 3);
    assert_eq!(book.tracks.len(), 1);
    assert_eq!(book.albums.len(), 1);
    assert_eq!(book.artists.len(), 1);
}

#[test]
fn test_merge_same_timestamp_is_not_duplicated() {
    let mut book = HistoryBook::new();

    assert!(book.merge(&observation("2024-03-01 10:00:00", "SongA", &[])));

    // Same primary keys everywhere and no genres: nothing left to add
    assert!(!book.merge(&observation("2024-03-01 10:00:00", "SongA", &[])));
    assert_eq!(book.plays.len(), 1);
}

#[test]
fn test_genre_counts_match_occurrences() {
    let mut book = HistoryBook::new();

    book.merge(&observation("2024-03-01 10:00:00", "SongA", &["Rock", "indie pop"]));
    book.merge(&observation("2024-03-01 10:04:00", "SongB", &["rock "]));
    book.merge(&observation("2024-03-01 10:08:00", "SongC", &["ROCK", "Indie Pop"]));

    // Counting folds case and whitespace into one key
    assert_eq!(book.genres.len(), 2);

    let rock = book.genres.iter().find(|g| g.name == "rock").unwrap();
    assert_eq!(rock.count, 3);

    let indie = book.genres.iter().find(|g| g.name == "indie pop").unwrap();
    assert_eq!(indie.count, 2);
}

#[test]
fn test_merge_ignores_empty_genres() {
    let mut book = HistoryBook::new();

    book.merge(&observation("2024-03-01 10:00:00", "SongA", &["", "  "]));

    assert!(book.genres.is_empty());
}

#[test]
fn test_load_missing_file_yields_empty_book() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.xlsx");

    let book = HistoryBook::load(&path).unwrap();

    assert!(book.plays.is_empty());
    assert!(book.tracks.is_empty());
    assert!(book.albums.is_empty());
    assert!(book.artists.is_empty());
    assert!(book.genres.is_empty());
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.xlsx");

    let mut book = HistoryBook::new();
    book.merge(&observation("2024-03-01 10:00:00", "SongA", &["rock", "indie pop"]));
    book.merge(&observation("2024-03-01 10:04:00", "SongB", &["rock"]));
    book.save(&path).unwrap();

    let loaded = HistoryBook::load(&path).unwrap();

    assert_eq!(loaded.plays, book.plays);
    assert_eq!(loaded.tracks, book.tracks);
    assert_eq!(loaded.albums, book.albums);
    assert_eq!(loaded.artists, book.artists);
    assert_eq!(loaded.genres, book.genres);
}

#[test]
fn test_merge_into_reloaded_book_keeps_keys_unique() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.xlsx");

    let mut book = HistoryBook::new();
    book.merge(&observation("2024-03-01 10:00:00", "SongA", &["rock"]));
    book.save(&path).unwrap();

    // A later cycle loads the file back and merges the next observation
    let mut reloaded = HistoryBook::load(&path).unwrap();
    reloaded.merge(&observation("2024-03-01 10:04:00", "SongA", &["rock"]));
    reloaded.save(&path).unwrap();

    let fin = HistoryBook::load(&path).unwrap();
    assert_eq!(fin.plays.len(), 2);
    assert_eq!(fin.tracks.len(), 1);
    assert_eq!(fin.artists.len(), 1);
    assert_eq!(fin.genres.len(), 1);
    assert_eq!(fin.genres[0].count, 2);
}

#[tokio::test]
async fn test_manager_record_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.xlsx");
    let manager = HistoryManager::new(Some(path));

    let play = observation("2024-03-01 10:00:00", "SongA", &[]);

    let first = manager.record(&play).await.unwrap();
    assert_eq!(first, SaveOutcome::Saved);

    // The identical observation has nothing left to contribute
    let second = manager.record(&play).await.unwrap();
    assert_eq!(second, SaveOutcome::NothingNew);

    let book = manager.load_book().unwrap();
    assert_eq!(book.plays.len(), 1);
    assert_eq!(book.tracks.len(), 1);
}
