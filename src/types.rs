use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStateResponse {
    pub item: Option<TrackItem>,
    pub progress_ms: Option<u64>,
    pub is_playing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackItem {
    pub id: String,
    pub name: String,
    pub album: AlbumItem,
    pub artists: Vec<ArtistRef>,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumItem {
    pub id: String,
    pub name: String,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistDetailResponse {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub images: Vec<Image>,
}

/// A fully assembled observation of the playback state.
///
/// Combines the playback state with the best-effort artist lookup. Multiple
/// artists are joined with `", "` into `artist_name`/`artist_id`, matching
/// the column layout of the history spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPlaying {
    pub timestamp: String,
    pub track_name: String,
    pub track_id: String,
    pub track_url: String,
    pub album_name: String,
    pub album_id: String,
    pub artist_name: String,
    pub artist_id: String,
    pub progress_ms: Option<u64>,
    pub track_image: Option<String>,
    pub album_image: Option<String>,
    pub artist_image: Option<String>,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub timestamp: String,
    pub track_id: String,
    pub album_id: String,
    pub artist_id: String,
    pub genres: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    pub id: String,
    pub url: String,
    pub image: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub name: String,
    pub id: String,
    pub image: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub name: String,
    pub id: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreCount {
    pub name: String,
    pub count: u64,
}

#[derive(Tabled)]
pub struct PlayTableRow {
    pub timestamp: String,
    pub track: String,
    pub artist: String,
    pub genres: String,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    pub genre: String,
    pub count: u64,
}
