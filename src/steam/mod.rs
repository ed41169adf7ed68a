//! # Steam Integration Module
//!
//! Presence lookups against the Steam Web API.
//!
//! - `GET /ISteamUser/GetPlayerSummaries/v0002/` - persona state and the game
//!   currently being played
//! - `GET /IPlayerService/GetOwnedGames/v0001/` - library with
//!   `rtime_last_played`, used to find the most recent game when the player
//!   is not in one
//!
//! Both endpoints authenticate with the `key` query parameter.

pub mod player;
