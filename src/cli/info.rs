use crate::{info, management::HistoryManager, warning};

/// Displays information about the history store.
///
/// Prints the workbook location, the row counts of every sheet, and the
/// most recent recorded play if any.
pub async fn info() {
    let manager = HistoryManager::new(None);

    info!("History file: {}", manager.path().display());

    if !manager.path().exists() {
        warning!("History file does not exist yet. Run sptrackcli record.");
        return;
    }

    match manager.load_book() {
        Ok(book) => {
            info!("Plays recorded: {}", book.plays.len());
            info!("Unique tracks: {}", book.tracks.len());
            info!("Unique albums: {}", book.albums.len());
            info!("Unique artists: {}", book.artists.len());
            info!("Distinct genres: {}", book.genres.len());

            if let Some(last) = book.plays.last() {
                let track = book.track_name(&last.track_id).unwrap_or(&last.track_id);
                info!("Last recorded play: {} at {}", track, last.timestamp);
            }
        }
        Err(e) => warning!("Failed to read history file. Err: {}", e),
    }
}
