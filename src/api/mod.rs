//! # API Module
//!
//! HTTP endpoints for the local callback server used during the OAuth flow.
//!
//! - [`callback`] - Handles OAuth callback requests from Spotify's
//!   authorization server and completes the PKCE flow by exchanging the
//!   authorization code for an access token.
//! - [`health`] - Health check endpoint returning status and version.
//!
//! The endpoints are plain [axum](https://docs.rs/axum) handlers wired up by
//! [`crate::server::start_api_server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
