use std::path::PathBuf;

use tabled::Table;

use crate::{
    info,
    management::HistoryManager,
    types::{GenreTableRow, PlayTableRow},
    warning,
};

pub async fn history(limit: usize, genres: bool, file: Option<String>) {
    let manager = HistoryManager::new(file.map(PathBuf::from));
    let book = match manager.load_book() {
        Ok(book) => book,
        Err(e) => {
            warning!(
                "Failed to load history from {}. Err: {}",
                manager.path().display(),
                e
            );
            return;
        }
    };

    if genres {
        if book.genres.is_empty() {
            info!("No genres recorded yet.");
            return;
        }

        let mut tallies = book.genres.clone();
        tallies.sort_by(|a, b| b.count.cmp(&a.count).then(a.name.cmp(&b.name)));

        let rows: Vec<GenreTableRow> = tallies
            .into_iter()
            .map(|g| GenreTableRow {
                genre: g.name,
                count: g.count,
            })
            .collect();

        println!("{}", Table::new(rows));
        return;
    }

    if book.plays.is_empty() {
        info!("No plays recorded yet.");
        return;
    }

    // plays are appended chronologically, so most recent come last
    let rows: Vec<PlayTableRow> = book
        .plays
        .iter()
        .rev()
        .take(limit)
        .map(|p| PlayTableRow {
            timestamp: p.timestamp.clone(),
            track: book
                .track_name(&p.track_id)
                .unwrap_or(&p.track_id)
                .to_string(),
            artist: book
                .artist_name(&p.artist_id)
                .unwrap_or(&p.artist_id)
                .to_string(),
            genres: p.genres.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
