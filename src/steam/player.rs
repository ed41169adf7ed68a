use reqwest::Client;

use crate::{
    config::Config,
    http,
    types::{
        Absence, Fetched, OwnedGame, OwnedGamesResponse, PersonaState, PlayerSummariesResponse,
        PresenceStatus, SteamPlayer,
    },
    warning,
};

/// Fetches the player summary of the configured Steam user.
///
/// Returns `Ok(None)` when the response lists no players, which is what
/// Steam answers for unknown or private ids. Errors never carry the request
/// URL, since its query holds the API key.
pub async fn get_player_summary(
    client: &Client,
    config: &Config,
) -> Result<Option<SteamPlayer>, reqwest::Error> {
    let request = client
        .get(format!(
            "{}/ISteamUser/GetPlayerSummaries/v0002/",
            config.steam.api_url
        ))
        .query(&[
            ("key", config.steam.api_key.as_str()),
            ("steamids", config.steam.steam_id.as_str()),
            ("format", "json"),
        ]);

    let summaries = async {
        http::send(request, config.http.retries)
            .await?
            .json::<PlayerSummariesResponse>()
            .await
    }
    .await
    .map_err(reqwest::Error::without_url)?;

    Ok(summaries.response.players.into_iter().next())
}

/// Fetches the owned games of the configured Steam user, including free
/// games and app names.
pub async fn get_owned_games(
    client: &Client,
    config: &Config,
) -> Result<Vec<OwnedGame>, reqwest::Error> {
    let request = client
        .get(format!(
            "{}/IPlayerService/GetOwnedGames/v0001/",
            config.steam.api_url
        ))
        .query(&[
            ("key", config.steam.api_key.as_str()),
            ("steamid", config.steam.steam_id.as_str()),
            ("include_appinfo", "1"),
            ("include_played_free_games", "1"),
            ("format", "json"),
        ]);

    let owned = async {
        http::send(request, config.http.retries)
            .await?
            .json::<OwnedGamesResponse>()
            .await
    }
    .await
    .map_err(reqwest::Error::without_url)?;

    Ok(owned.response.games)
}

/// Name of the game with the latest `rtime_last_played`. Among equal
/// timestamps the first one in response order wins.
pub fn most_recent_game(mut games: Vec<OwnedGame>) -> Option<String> {
    games.sort_by(|a, b| b.rtime_last_played.cmp(&a.rtime_last_played));
    games.into_iter().next().and_then(|game| game.name)
}

/// Determines the presence section of the page.
///
/// When the player is not in a game the owned-games endpoint is asked for
/// the most recently played title. A failure of that second call only
/// leaves `last_played_game` empty.
///
/// # Errors
///
/// - [`Absence::Upstream`] if the player summary cannot be fetched
/// - [`Absence::NoData`] if the summary lists no player
pub async fn fetch_presence_status(client: &Client, config: &Config) -> Fetched<PresenceStatus> {
    let player = match get_player_summary(client, config).await {
        Ok(Some(player)) => player,
        Ok(None) => return Err(Absence::NoData),
        Err(e) => {
            warning!("[steam] API error: {}", e);
            return Err(Absence::Upstream(e.to_string()));
        }
    };

    let state = PersonaState::from_code(player.personastate);
    let current_game = player.gameextrainfo.filter(|game| !game.is_empty());

    let last_played_game = if current_game.is_none() {
        match get_owned_games(client, config).await {
            Ok(games) => most_recent_game(games),
            Err(e) => {
                warning!("[steam] owned-games error: {}", e);
                None
            }
        }
    } else {
        None
    };

    Ok(PresenceStatus {
        state,
        current_game,
        last_played_game,
    })
}
