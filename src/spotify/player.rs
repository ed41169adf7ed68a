use reqwest::{Client, StatusCode};

use crate::{
    config::Config,
    http,
    management::TokenCache,
    types::{
        Absence, CurrentlyPlayingResponse, Fetched, MusicStatus, Playback, RecentlyPlayedResponse,
        SpotifyImage, SpotifyTrack,
    },
    warning,
};

// Images without a reported width sort after every real size.
const UNKNOWN_IMAGE_WIDTH: u32 = 999;

/// Picks the URL of the smallest image, keeping response order among equal
/// widths. The page only uses it as a blurred background, so the thumbnail
/// is enough.
pub fn smallest_image(images: &[SpotifyImage]) -> String {
    images
        .iter()
        .min_by_key(|image| image.width.unwrap_or(UNKNOWN_IMAGE_WIDTH))
        .map(|image| image.url.clone())
        .unwrap_or_default()
}

fn music_status(track: SpotifyTrack, progress_ms: i64, playback: Playback) -> MusicStatus {
    let artists = track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    MusicStatus {
        album_art_url: smallest_image(&track.album.images),
        track: track.name,
        artists,
        album: track.album.name,
        progress_ms,
        duration_ms: track.duration_ms,
        playback,
    }
}

/// Queries what the user is listening to right now.
///
/// `Ok(None)` means nothing is playing: a `204 No Content` answer or a body
/// without a track item (Spotify does that for ads and some podcasts).
pub async fn get_currently_playing(
    client: &Client,
    config: &Config,
    token: &str,
) -> Result<Option<MusicStatus>, reqwest::Error> {
    let request = client
        .get(format!("{}/me/player/currently-playing", config.spotify.api_url))
        .bearer_auth(token);
    let response = http::send(request, config.http.retries).await?;

    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let current = response.json::<CurrentlyPlayingResponse>().await?;
    let playback = if current.is_playing {
        Playback::Playing
    } else {
        Playback::Paused
    };

    Ok(current
        .item
        .map(|track| music_status(track, current.progress_ms.unwrap_or(0), playback)))
}

/// Queries the most recently played track.
pub async fn get_recently_played(
    client: &Client,
    config: &Config,
    token: &str,
) -> Result<Option<MusicStatus>, reqwest::Error> {
    let request = client
        .get(format!("{}/me/player/recently-played", config.spotify.api_url))
        .query(&[("limit", "1")])
        .bearer_auth(token);
    let recent = http::send(request, config.http.retries)
        .await?
        .json::<RecentlyPlayedResponse>()
        .await?;

    Ok(recent
        .items
        .into_iter()
        .next()
        .map(|item| music_status(item.track, 0, Playback::LastPlayed)))
}

/// Determines the music section of the page.
///
/// # Behavior
///
/// 1. Obtains an access token through the token cache
/// 2. Asks for the currently playing track; a failure here is logged and
///    treated as "nothing playing"
/// 3. Falls back to the most recently played track
///
/// # Errors
///
/// - [`Absence::NoToken`] if no access token could be obtained
/// - [`Absence::Upstream`] if the recently-played fallback fails
/// - [`Absence::NoData`] if the listening history is empty
pub async fn fetch_music_status(client: &Client, config: &Config) -> Fetched<MusicStatus> {
    let token = TokenCache::from_config(config)
        .get_valid_token(client, config)
        .await?;

    match get_currently_playing(client, config, &token).await {
        Ok(Some(status)) => return Ok(status),
        Ok(None) => {}
        Err(e) => warning!("[spotify] API error: {}", e.without_url()),
    }

    match get_recently_played(client, config, &token).await {
        Ok(Some(status)) => Ok(status),
        Ok(None) => Err(Absence::NoData),
        Err(e) => {
            let e = e.without_url();
            warning!("[spotify] recently-played error: {}", e);
            Err(Absence::Upstream(e.to_string()))
        }
    }
}
