//! # Spotify Integration Module
//!
//! Interface to the Spotify Web API operations the recorder needs. It
//! handles HTTP communication, the authentication flow, and the error
//! handling quirks of the API, providing a clean Rust interface for the
//! higher-level application logic.
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 PKCE (Proof Key for Code Exchange) flow: verifier
//!   and challenge generation, browser launch, local callback server, token
//!   exchange and refresh. No client secret is stored or transmitted.
//! - [`player`] - Playback state retrieval (`GET /me/player`) and the artist
//!   detail lookup (`GET /artists/{id}`) used for genres and images.
//!
//! ## Error Handling
//!
//! - **Rate limiting**: 429 responses honor the `retry-after` header with a
//!   bounded delay.
//! - **Transient failures**: 502 Bad Gateway responses are retried after a
//!   fixed delay.
//! - **Token expiration**: tokens are refreshed proactively with a 4-minute
//!   buffer by [`crate::management::TokenManager`].
//!
//! All functions return `Result` types; HTTP and network failures surface as
//! `reqwest::Error`, authentication problems as `String`.

pub mod auth;
pub mod player;
