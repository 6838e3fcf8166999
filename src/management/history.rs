use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use calamine::{Data, DataType, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Workbook, Worksheet};
use tokio::time::sleep;

use crate::{
    config,
    types::{AlbumRecord, ArtistRecord, GenreCount, NowPlaying, PlayRecord, TrackRecord},
    utils, warning,
};

pub const SHEET_PLAYS: &str = "plays";
pub const SHEET_TRACKS: &str = "tracks";
pub const SHEET_ALBUMS: &str = "albums";
pub const SHEET_ARTISTS: &str = "artists";
pub const SHEET_GENRES: &str = "genres";

const PLAYS_COLUMNS: [&str; 5] = ["Timestamp", "Track ID", "Album ID", "Artist ID", "Genres"];
const TRACKS_COLUMNS: [&str; 5] = ["Song Name", "Track ID", "Song URL", "Track Image", "Artist"];
const ALBUMS_COLUMNS: [&str; 4] = ["Album", "Album ID", "Album Image", "Artist"];
const ARTISTS_COLUMNS: [&str; 3] = ["Artist", "Artist ID", "Artist Image"];
const GENRES_COLUMNS: [&str; 2] = ["Genre", "Count"];

const MAX_SAVE_RETRIES: u32 = 3;
const LOCK_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub enum HistoryError {
    IoError(std::io::Error),
    ReadError(calamine::XlsxError),
    WriteError(rust_xlsxwriter::XlsxError),
}

impl HistoryError {
    /// A workbook held open by a spreadsheet application surfaces here as a
    /// permission-denied I/O error. Only that condition is worth retrying.
    pub fn is_lock(&self) -> bool {
        match self {
            HistoryError::IoError(e) => e.kind() == ErrorKind::PermissionDenied,
            HistoryError::ReadError(calamine::XlsxError::Io(e)) => {
                e.kind() == ErrorKind::PermissionDenied
            }
            HistoryError::WriteError(rust_xlsxwriter::XlsxError::IoError(e)) => {
                e.kind() == ErrorKind::PermissionDenied
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::IoError(e) => write!(f, "io error: {}", e),
            HistoryError::ReadError(e) => write!(f, "cannot read workbook: {}", e),
            HistoryError::WriteError(e) => write!(f, "cannot write workbook: {}", e),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        HistoryError::IoError(err)
    }
}

/// In-memory image of the five history sheets.
///
/// Non-genre tables are append-only and keyed by their primary column; the
/// genre table carries a monotonically incremented tally per normalized
/// genre string.
#[derive(Debug, Clone, Default)]
pub struct HistoryBook {
    pub plays: Vec<PlayRecord>,
    pub tracks: Vec<TrackRecord>,
    pub albums: Vec<AlbumRecord>,
    pub artists: Vec<ArtistRecord>,
    pub genres: Vec<GenreCount>,
}

impl HistoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads all sheets from the workbook at `path`.
    ///
    /// A missing file yields an empty book; missing sheets yield empty
    /// tables. Any other read failure is propagated.
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let opened: Result<Xlsx<_>, _> = open_workbook(path);
        let mut workbook = match opened {
            Ok(wb) => wb,
            Err(calamine::XlsxError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                return Ok(Self::new());
            }
            Err(e) => return Err(HistoryError::ReadError(e)),
        };

        let sheet_names = workbook.sheet_names().to_owned();
        let mut book = Self::new();

        if sheet_names.iter().any(|n| n == SHEET_PLAYS) {
            let range = workbook
                .worksheet_range(SHEET_PLAYS)
                .map_err(HistoryError::ReadError)?;
            for row in range.rows().skip(1) {
                let timestamp = cell_string(row, 0);
                if timestamp.is_empty() {
                    continue;
                }
                book.plays.push(PlayRecord {
                    timestamp,
                    track_id: cell_string(row, 1),
                    album_id: cell_string(row, 2),
                    artist_id: cell_string(row, 3),
                    genres: cell_string(row, 4),
                });
            }
        }

        if sheet_names.iter().any(|n| n == SHEET_TRACKS) {
            let range = workbook
                .worksheet_range(SHEET_TRACKS)
                .map_err(HistoryError::ReadError)?;
            for row in range.rows().skip(1) {
                let id = cell_string(row, 1);
                if id.is_empty() {
                    continue;
                }
                book.tracks.push(TrackRecord {
                    name: cell_string(row, 0),
                    id,
                    url: cell_string(row, 2),
                    image: cell_string(row, 3),
                    artist: cell_string(row, 4),
                });
            }
        }

        if sheet_names.iter().any(|n| n == SHEET_ALBUMS) {
            let range = workbook
                .worksheet_range(SHEET_ALBUMS)
                .map_err(HistoryError::ReadError)?;
            for row in range.rows().skip(1) {
                let id = cell_string(row, 1);
                if id.is_empty() {
                    continue;
                }
                book.albums.push(AlbumRecord {
                    name: cell_string(row, 0),
                    id,
                    image: cell_string(row, 2),
                    artist: cell_string(row, 3),
                });
            }
        }

        if sheet_names.iter().any(|n| n == SHEET_ARTISTS) {
            let range = workbook
                .worksheet_range(SHEET_ARTISTS)
                .map_err(HistoryError::ReadError)?;
            for row in range.rows().skip(1) {
                let id = cell_string(row, 1);
                if id.is_empty() {
                    continue;
                }
                book.artists.push(ArtistRecord {
                    name: cell_string(row, 0),
                    id,
                    image: cell_string(row, 2),
                });
            }
        }

        if sheet_names.iter().any(|n| n == SHEET_GENRES) {
            let range = workbook
                .worksheet_range(SHEET_GENRES)
                .map_err(HistoryError::ReadError)?;
            for row in range.rows().skip(1) {
                let name = cell_string(row, 0);
                if name.is_empty() {
                    continue;
                }
                book.genres.push(GenreCount {
                    name,
                    count: cell_count(row, 1),
                });
            }
        }

        Ok(book)
    }

    /// Merges one playback observation into the tables.
    ///
    /// Appends a row to each non-genre sheet whose primary key is not yet
    /// present and increments the tally of every observed genre. Returns
    /// `true` when any sheet changed.
    pub fn merge(&mut self, play: &NowPlaying) -> bool {
        let mut changed = false;

        if !self.plays.iter().any(|p| p.timestamp == play.timestamp) {
            self.plays.push(PlayRecord {
                timestamp: play.timestamp.clone(),
                track_id: play.track_id.clone(),
                album_id: play.album_id.clone(),
                artist_id: play.artist_id.clone(),
                genres: play.genres.join(", "),
            });
            changed = true;
        }

        if !self.tracks.iter().any(|t| t.id == play.track_id) {
            self.tracks.push(TrackRecord {
                name: play.track_name.clone(),
                id: play.track_id.clone(),
                url: play.track_url.clone(),
                image: play.track_image.clone().unwrap_or_default(),
                artist: play.artist_name.clone(),
            });
            changed = true;
        }

        if !self.albums.iter().any(|a| a.id == play.album_id) {
            self.albums.push(AlbumRecord {
                name: play.album_name.clone(),
                id: play.album_id.clone(),
                image: play.album_image.clone().unwrap_or_default(),
                artist: play.artist_name.clone(),
            });
            changed = true;
        }

        if !self.artists.iter().any(|a| a.id == play.artist_id) {
            self.artists.push(ArtistRecord {
                name: play.artist_name.clone(),
                id: play.artist_id.clone(),
                image: play.artist_image.clone().unwrap_or_default(),
            });
            changed = true;
        }

        for genre in &play.genres {
            let key = utils::normalize_genre(genre);
            if key.is_empty() {
                continue;
            }
            match self.genres.iter_mut().find(|g| g.name == key) {
                Some(tally) => tally.count += 1,
                None => self.genres.push(GenreCount {
                    name: key,
                    count: 1,
                }),
            }
            changed = true;
        }

        changed
    }

    /// Rewrites the whole workbook at `path` from the in-memory tables.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_PLAYS).map_err(HistoryError::WriteError)?;
        write_header(sheet, &PLAYS_COLUMNS)?;
        for (i, play) in self.plays.iter().enumerate() {
            let row = (i + 1) as u32;
            write_row(
                sheet,
                row,
                &[
                    play.timestamp.as_str(),
                    play.track_id.as_str(),
                    play.album_id.as_str(),
                    play.artist_id.as_str(),
                    play.genres.as_str(),
                ],
            )?;
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_TRACKS).map_err(HistoryError::WriteError)?;
        write_header(sheet, &TRACKS_COLUMNS)?;
        for (i, track) in self.tracks.iter().enumerate() {
            let row = (i + 1) as u32;
            write_row(
                sheet,
                row,
                &[
                    track.name.as_str(),
                    track.id.as_str(),
                    track.url.as_str(),
                    track.image.as_str(),
                    track.artist.as_str(),
                ],
            )?;
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_ALBUMS).map_err(HistoryError::WriteError)?;
        write_header(sheet, &ALBUMS_COLUMNS)?;
        for (i, album) in self.albums.iter().enumerate() {
            let row = (i + 1) as u32;
            write_row(
                sheet,
                row,
                &[
                    album.name.as_str(),
                    album.id.as_str(),
                    album.image.as_str(),
                    album.artist.as_str(),
                ],
            )?;
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_ARTISTS).map_err(HistoryError::WriteError)?;
        write_header(sheet, &ARTISTS_COLUMNS)?;
        for (i, artist) in self.artists.iter().enumerate() {
            let row = (i + 1) as u32;
            write_row(
                sheet,
                row,
                &[artist.name.as_str(), artist.id.as_str(), artist.image.as_str()],
            )?;
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_GENRES).map_err(HistoryError::WriteError)?;
        write_header(sheet, &GENRES_COLUMNS)?;
        for (i, tally) in self.genres.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, tally.name.as_str())
                .map_err(HistoryError::WriteError)?;
            sheet
                .write_number(row, 1, tally.count as f64)
                .map_err(HistoryError::WriteError)?;
        }

        workbook.save(path).map_err(HistoryError::WriteError)
    }

    /// Looks up the recorded track name for a track id.
    pub fn track_name(&self, track_id: &str) -> Option<&str> {
        self.tracks
            .iter()
            .find(|t| t.id == track_id)
            .map(|t| t.name.as_str())
    }

    /// Looks up the recorded artist name for an artist id.
    pub fn artist_name(&self, artist_id: &str) -> Option<&str> {
        self.artists
            .iter()
            .find(|a| a.id == artist_id)
            .map(|a| a.name.as_str())
    }
}

/// Outcome of a merge-and-save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// At least one sheet changed and the workbook was rewritten.
    Saved,
    /// Every row was already present; the file was left untouched.
    NothingNew,
}

/// Owns the workbook path and drives the load-merge-save cycle.
pub struct HistoryManager {
    path: PathBuf,
}

impl HistoryManager {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.unwrap_or_else(config::history_file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_book(&self) -> Result<HistoryBook, HistoryError> {
        HistoryBook::load(&self.path)
    }

    /// Loads the workbook, merges the observation and rewrites the file.
    ///
    /// The file is reloaded on every call so edits made between polls are
    /// picked up. When the file is locked by another application the whole
    /// cycle is retried a bounded number of times with a fixed delay; any
    /// other failure is returned immediately.
    pub async fn record(&self, play: &NowPlaying) -> Result<SaveOutcome, HistoryError> {
        let mut retries = 0;
        loop {
            match self.try_record(play) {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_lock() && retries < MAX_SAVE_RETRIES => {
                    retries += 1;
                    warning!(
                        "History file is locked. Retry {} of {}",
                        retries,
                        MAX_SAVE_RETRIES
                    );
                    sleep(LOCK_RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn try_record(&self, play: &NowPlaying) -> Result<SaveOutcome, HistoryError> {
        let mut book = HistoryBook::load(&self.path)?;
        if !book.merge(play) {
            return Ok(SaveOutcome::NothingNew);
        }
        book.save(&self.path)?;
        Ok(SaveOutcome::Saved)
    }
}

fn cell_string(row: &[Data], idx: usize) -> String {
    match row.get(idx) {
        Some(cell) if !cell.is_empty() => cell.to_string(),
        _ => String::new(),
    }
}

fn cell_count(row: &[Data], idx: usize) -> u64 {
    row.get(idx)
        .and_then(|cell| {
            cell.as_f64()
                .or_else(|| cell.to_string().trim().parse::<f64>().ok())
        })
        .map(|f| f as u64)
        .unwrap_or(0)
}

fn write_header(sheet: &mut Worksheet, columns: &[&str]) -> Result<(), HistoryError> {
    for (i, name) in columns.iter().enumerate() {
        sheet
            .write_string(0, i as u16, *name)
            .map_err(HistoryError::WriteError)?;
    }
    Ok(())
}

fn write_row(sheet: &mut Worksheet, row: u32, cells: &[&str]) -> Result<(), HistoryError> {
    for (i, value) in cells.iter().enumerate() {
        sheet
            .write_string(row, i as u16, *value)
            .map_err(HistoryError::WriteError)?;
    }
    Ok(())
}
