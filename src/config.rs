//! Configuration management for the Spotify Listening History Recorder.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify API credentials, the
//! callback server address, and the location of the history spreadsheet.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// Default poll interval of the recorder in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `sptrackcli/.env`. This allows users to store
/// configuration securely without hardcoding sensitive values.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/sptrackcli/.env`
/// - macOS: `~/Library/Application Support/sptrackcli/.env`
/// - Windows: `%LOCALAPPDATA%/sptrackcli/.env`
///
/// # Returns
///
/// Returns `Ok(())` if the environment file is successfully loaded, or an
/// error string if directory creation or file loading fails.
///
/// # Example
///
/// ```
/// use sptrackcli::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sptrackcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(path).map_err(|e| e.to_string())?;
    Ok(())
}

/// Returns the server address for the local OAuth callback server.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify API client ID for authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// This must match the redirect URI registered in the Spotify application
/// settings.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the Spotify API scope permissions.
///
/// The recorder needs at least `user-read-currently-playing` and
/// `user-read-playback-state`.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_SCOPE` environment variable is not set.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").expect("SPOTIFY_API_AUTH_SCOPE must be set")
}

/// Returns the Spotify OAuth authorization URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_URL` environment variable is not set.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// Returns the Spotify Web API base URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the Spotify OAuth token exchange URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Returns the path of the history spreadsheet.
///
/// Reads the `HISTORY_FILE` environment variable if set, otherwise defaults
/// to `sptrackcli/spotify-history.xlsx` in the platform-specific local data
/// directory.
///
/// # Example
///
/// ```
/// let path = history_file(); // e.g. ~/.local/share/sptrackcli/spotify-history.xlsx
/// ```
pub fn history_file() -> PathBuf {
    match env::var("HISTORY_FILE") {
        Ok(file) => PathBuf::from(file),
        Err(_) => {
            let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("sptrackcli/spotify-history.xlsx");
            path
        }
    }
}

/// Returns the poll interval of the recorder in seconds.
///
/// Reads the `POLL_INTERVAL_SECS` environment variable if set and parseable,
/// otherwise defaults to [`DEFAULT_POLL_INTERVAL_SECS`].
pub fn poll_interval_secs() -> u64 {
    env::var("POLL_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
}
