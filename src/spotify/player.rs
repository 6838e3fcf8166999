use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    config,
    types::{ArtistDetailResponse, PlaybackStateResponse},
    warning,
};

/// Retrieves the current playback state from the Spotify Web API.
///
/// Calls `GET /me/player` with the given access token. Spotify answers with
/// HTTP 204 and an empty body when no device is playing; that case is
/// reported as `Ok(None)` rather than an error.
///
/// # Returns
///
/// - `Ok(Some(PlaybackStateResponse))` - A playback state, possibly paused
///   or without a track item
/// - `Ok(None)` - Nothing is playing on any device
/// - `Err(reqwest::Error)` - Network error, API error, or decode failure
///
/// # Retry Logic
///
/// 502 Bad Gateway responses are retried after a 10-second delay. 429 Too
/// Many Requests honors the `retry-after` header when it stays below two
/// minutes. Other errors are propagated immediately.
pub async fn get_playback_state(
    token: &str,
) -> Result<Option<PlaybackStateResponse>, reqwest::Error> {
    loop {
        let api_url = format!("{uri}/me/player", uri = &config::spotify_apiurl());

        let client = Client::new();
        let response = client.get(&api_url).bearer_auth(token).send().await;

        let response = match response {
            Ok(resp) => {
                if resp.status() == StatusCode::NO_CONTENT {
                    return Ok(None);
                }
                if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                    retry_after_delay(&resp).await;
                    continue;
                }
                match resp.error_for_status() {
                    Ok(valid_response) => valid_response,
                    Err(err) => {
                        if let Some(status) = err.status() {
                            if status == StatusCode::BAD_GATEWAY {
                                sleep(Duration::from_secs(10)).await;
                                continue; // retry
                            }
                        }
                        return Err(err); // propagate other errors
                    }
                }
            }
            Err(err) => {
                return Err(err);
            } // network or reqwest error
        };

        let res = response.json::<PlaybackStateResponse>().await?;

        return Ok(Some(res));
    }
}

/// Retrieves the full artist object for a single artist id.
///
/// Calls `GET /artists/{id}`. The recorder uses this as the best-effort
/// secondary lookup for the genre list and the artist image, keyed on the
/// primary artist of the playing track.
///
/// # Retry Logic
///
/// Same as [`get_playback_state`]: 502 retries after 10 seconds, 429 honors
/// `retry-after`, everything else propagates.
pub async fn get_artist(
    artist_id: &str,
    token: &str,
) -> Result<ArtistDetailResponse, reqwest::Error> {
    loop {
        let api_url = format!(
            "{uri}/artists/{id}",
            uri = &config::spotify_apiurl(),
            id = artist_id
        );

        let client = Client::new();
        let response = client.get(&api_url).bearer_auth(token).send().await;

        let response = match response {
            Ok(resp) => {
                if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                    retry_after_delay(&resp).await;
                    continue;
                }
                match resp.error_for_status() {
                    Ok(valid_response) => valid_response,
                    Err(err) => {
                        if let Some(status) = err.status() {
                            if status == StatusCode::BAD_GATEWAY {
                                sleep(Duration::from_secs(10)).await;
                                continue; // retry
                            }
                        }
                        return Err(err);
                    }
                }
            }
            Err(err) => {
                return Err(err);
            }
        };

        let res = response.json::<ArtistDetailResponse>().await?;

        return Ok(res);
    }
}

async fn retry_after_delay(response: &reqwest::Response) {
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1);
    if retry_after > 120 {
        warning!(
            "Retry after has reached an abnormal high of {} seconds. Waiting two minutes instead.",
            retry_after
        );
    }
    sleep(Duration::from_secs(retry_after.min(120))).await;
}
