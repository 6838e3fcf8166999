use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;

use crate::{
    config, error, info,
    management::{HistoryManager, SaveOutcome, TokenManager},
    spotify, success,
    types::NowPlaying,
    utils::{self, ChangeDetector},
    warning,
};

/// Runs the recorder loop until Ctrl-C.
///
/// Every poll fetches the playback state, asks the change detector whether
/// the observation is a new listening event, and merges it into the history
/// spreadsheet when it is. Fetch and save failures are logged and skipped;
/// the loop never dies on them.
pub async fn record(interval: Option<u64>, output: Option<String>) {
    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run sptrackcli auth\n Error: {}",
                e
            );
        }
    };

    let history = HistoryManager::new(output.map(PathBuf::from));
    let poll_interval = Duration::from_secs(interval.unwrap_or_else(config::poll_interval_secs));
    let mut detector = ChangeDetector::new();

    info!(
        "Recording listening history to {}. Press Ctrl+C to stop.",
        history.path().display()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for playback...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    loop {
        match fetch_now_playing(&mut token_mgr).await {
            Some(play) => {
                pb.set_message(format!(
                    "Listening: {} - {}",
                    play.artist_name, play.track_name
                ));

                if detector.observe(&play.track_name, play.progress_ms) {
                    match history.record(&play).await {
                        Ok(SaveOutcome::Saved) => {
                            success!(
                                "Recorded: {} by {} at {}",
                                play.track_name,
                                play.artist_name,
                                play.timestamp
                            );
                        }
                        Ok(SaveOutcome::NothingNew) => {
                            info!("No new unique data to save.");
                        }
                        Err(e) => {
                            warning!("Error saving history: {}", e);
                        }
                    }
                }
            }
            None => {
                pb.set_message("Waiting for playback...");
            }
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                pb.finish_and_clear();
                info!("Stopping listening history recorder.");
                break;
            }
            _ = sleep(poll_interval) => {}
        }
    }
}

/// Fetches the playback state and assembles a [`NowPlaying`] observation.
///
/// Returns `None` when nothing is playing or the fetch failed (logged). The
/// artist lookup for genres and the artist image is best-effort and caught
/// independently so its failure does not discard the observation.
async fn fetch_now_playing(token_mgr: &mut TokenManager) -> Option<NowPlaying> {
    let token = token_mgr.get_valid_token().await;

    let playback = match spotify::player::get_playback_state(&token).await {
        Ok(Some(state)) => state,
        Ok(None) => return None,
        Err(e) => {
            warning!("Error fetching current track: {}", e);
            return None;
        }
    };

    let item = playback.item?;

    let artist_name = utils::join_fields(&item.artists, |a| a.name.as_str());
    let artist_id = utils::join_fields(&item.artists, |a| a.id.as_str());

    let track_image = item.album.images.first().map(|i| i.url.clone());
    let album_image = track_image.clone();

    let (artist_image, genres) = match item.artists.first() {
        Some(primary) => match spotify::player::get_artist(&primary.id, &token).await {
            Ok(artist) => (artist.images.first().map(|i| i.url.clone()), artist.genres),
            Err(e) => {
                warning!("Error fetching artist details: {}", e);
                (None, Vec::new())
            }
        },
        None => (None, Vec::new()),
    };

    Some(NowPlaying {
        timestamp: utils::local_timestamp(),
        track_name: item.name,
        track_id: item.id,
        track_url: item.external_urls.spotify,
        album_name: item.album.name,
        album_id: item.album.id,
        artist_name,
        artist_id,
        progress_ms: playback.progress_ms,
        track_image,
        album_image,
        artist_image,
        genres,
    })
}
