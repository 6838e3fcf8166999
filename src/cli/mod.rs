//! # CLI Module
//!
//! Command implementations for the listening history recorder. Each command
//! delegates to the management and Spotify layers and handles user
//! interaction, progress feedback, and error presentation.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth authentication flow with PKCE security
//! - [`record`] - Poll the playback state and append new listening events
//!   to the history spreadsheet
//! - [`history`] - Display recorded plays or the genre tally
//! - [`info`] - Show the history file location and per-sheet statistics
//!
//! ## Usage Patterns
//!
//! ```bash
//! sptrackcli auth                  # Authenticate with Spotify
//! sptrackcli record                # Start the recorder loop
//! sptrackcli history --limit 50    # Show the last 50 plays
//! sptrackcli history --genres      # Show the genre tally
//! sptrackcli info                  # Check the history store
//! ```

mod auth;
mod history;
mod info;
mod record;

pub use auth::auth;
pub use history::history;
pub use info::info;
pub use record::record;
