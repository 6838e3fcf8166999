use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Local;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

/// Playback progress below this threshold counts as a track restart.
pub const RESTART_THRESHOLD_MS: u64 = 2_000;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Current local time formatted as it is stored in the plays sheet.
pub fn local_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Folds a genre string to its tally key: trimmed, lowercased.
pub fn normalize_genre(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Joins the name/id fields of a slice into the `", "`-separated form the
/// spreadsheet columns carry.
pub fn join_fields<T, F>(items: &[T], field: F) -> String
where
    F: Fn(&T) -> &str,
{
    items
        .iter()
        .map(|i| field(i))
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Decides whether an observed playback state is a new listening event.
///
/// An event fires when the observed track name differs from the last
/// recorded one, or when playback progress is below
/// [`RESTART_THRESHOLD_MS`]. The restart signal keys on progress alone and
/// is not cross-checked against the track id, so a track first observed
/// within its opening two seconds also counts as a restart.
pub struct ChangeDetector {
    last_track: Option<String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self { last_track: None }
    }

    /// Returns `true` when the observation is a new listening event and
    /// records the track name as the last seen one.
    pub fn observe(&mut self, track_name: &str, progress_ms: Option<u64>) -> bool {
        let is_new_track = self.last_track.as_deref() != Some(track_name);
        let has_restarted = progress_ms.is_some_and(|p| p < RESTART_THRESHOLD_MS);

        if is_new_track || has_restarted {
            self.last_track = Some(track_name.to_string());
            return true;
        }

        false
    }

    pub fn last_track(&self) -> Option<&str> {
        self.last_track.as_deref()
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}
