//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API the status page needs.
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Token endpoint calls:
//! - **Refresh Exchange**: Trades the configured refresh token for an access
//!   token on every run whose cached token is stale
//! - **Authorization Code Flow**: One-time interactive flow (`statusboard auth`)
//!   that produces the refresh token, with a local callback server and
//!   browser launch
//!
//! ### Player Module
//!
//! [`player`] - Playback state:
//! - `GET /me/player/currently-playing` for the active track
//! - `GET /me/player/recently-played?limit=1` as the fallback when nothing
//!   is active
//!
//! ## Error Handling
//!
//! Endpoint functions return `reqwest::Error`. [`player::fetch_music_status`]
//! folds every failure into an [`crate::types::Absence`] so a Spotify outage
//! only idles the music section of the page.
//!
//! ## Access Tokens
//!
//! Access tokens are cached by [`crate::management::TokenCache`] for 3000
//! seconds. Requests authenticate with `Authorization: Bearer`; the token
//! endpoint uses HTTP Basic auth with the client id and secret.

pub mod auth;
pub mod player;
