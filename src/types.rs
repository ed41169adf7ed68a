use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Access token persisted by the token cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    /// Epoch seconds at which the token was fetched.
    pub timestamp: i64,
}

/// Successful answer of the Spotify token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// State shared between the authorization flow and its callback handler.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    /// Value the callback must echo back.
    pub state: String,
    pub code: Option<String>,
    pub error: Option<String>,
}

impl PendingAuthorization {
    pub fn new(state: String) -> Self {
        Self {
            state,
            code: None,
            error: None,
        }
    }
}

/// Why a fetcher produced no status this run.
#[derive(Debug, Clone, PartialEq)]
pub enum Absence {
    /// No access token could be obtained.
    NoToken(String),
    /// The upstream call failed, timed out or answered with an error status.
    Upstream(String),
    /// The upstream answered but had nothing to report.
    NoData,
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Absence::NoToken(reason) => write!(f, "no access token: {}", reason),
            Absence::Upstream(reason) => write!(f, "upstream unavailable: {}", reason),
            Absence::NoData => write!(f, "nothing to report"),
        }
    }
}

impl std::error::Error for Absence {}

pub type Fetched<T> = Result<T, Absence>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Playing,
    Paused,
    LastPlayed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MusicStatus {
    pub track: String,
    pub artists: String,
    pub album: String,
    /// Empty when the album has no artwork.
    pub album_art_url: String,
    pub progress_ms: i64,
    pub duration_ms: i64,
    pub playback: Playback,
}

impl MusicStatus {
    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    pub fn last_played(&self) -> bool {
        self.playback == Playback::LastPlayed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaState {
    Offline,
    Online,
    Busy,
    Away,
    Snooze,
}

impl PersonaState {
    /// Maps a Steam `personastate` code. "Looking to trade" (5) and "looking
    /// to play" (6) display as Online; unknown codes display as Offline.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 | 5 | 6 => PersonaState::Online,
            2 => PersonaState::Busy,
            3 => PersonaState::Away,
            4 => PersonaState::Snooze,
            _ => PersonaState::Offline,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersonaState::Offline => "Offline",
            PersonaState::Online => "Online",
            PersonaState::Busy => "Busy",
            PersonaState::Away => "Away",
            PersonaState::Snooze => "Snooze",
        }
    }
}

impl fmt::Display for PersonaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresenceStatus {
    pub state: PersonaState,
    pub current_game: Option<String>,
    pub last_played_game: Option<String>,
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

fn one_ms() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(default = "one_ms")]
    pub duration_ms: i64,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub album: SpotifyAlbum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<i64>,
    #[serde(default)]
    pub item: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentlyPlayedItem {
    pub track: SpotifyTrack,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentlyPlayedResponse {
    #[serde(default)]
    pub items: Vec<RecentlyPlayedItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SteamPlayer {
    #[serde(default)]
    pub personastate: i64,
    #[serde(default)]
    pub gameextrainfo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerList {
    #[serde(default)]
    pub players: Vec<SteamPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSummariesResponse {
    #[serde(default)]
    pub response: PlayerList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnedGame {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rtime_last_played: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnedGameList {
    #[serde(default)]
    pub games: Vec<OwnedGame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnedGamesResponse {
    #[serde(default)]
    pub response: OwnedGameList,
}

#[derive(Tabled)]
pub struct StatusTableRow {
    pub source: String,
    pub state: String,
    pub detail: String,
}
