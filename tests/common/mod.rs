#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Extension, Json, Router,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const FRESH_TOKEN: &str = "fresh-access-token";

/// Canned answers of the fake Spotify and Steam APIs.
#[derive(Clone)]
pub struct Upstream {
    pub token_status: StatusCode,
    /// `None` answers `204 No Content`.
    pub currently_playing: Option<Value>,
    pub currently_playing_status: StatusCode,
    pub recently_played: Value,
    pub recently_played_status: StatusCode,
    pub player_summaries: Value,
    pub player_summaries_status: StatusCode,
    pub owned_games: Value,
    pub owned_games_status: StatusCode,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            currently_playing: None,
            currently_playing_status: StatusCode::OK,
            recently_played: json!({ "items": [] }),
            recently_played_status: StatusCode::OK,
            player_summaries: json!({ "response": { "players": [] } }),
            player_summaries_status: StatusCode::OK,
            owned_games: json!({ "response": { "games": [] } }),
            owned_games_status: StatusCode::OK,
        }
    }
}

#[derive(Default)]
pub struct Counters {
    pub token: AtomicUsize,
    pub currently_playing: AtomicUsize,
    pub recently_played: AtomicUsize,
    pub player_summaries: AtomicUsize,
    pub owned_games: AtomicUsize,
    pub token_authorization: Mutex<Option<String>>,
    pub token_body: Mutex<Option<String>>,
    pub bearer: Mutex<Option<String>>,
    pub last_query: Mutex<Option<String>>,
}

impl Counters {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct MockUpstream {
    pub base: String,
    pub counters: Arc<Counters>,
}

type Shared = Arc<(Upstream, Arc<Counters>)>;

fn json_response(status: StatusCode, body: &Value) -> Response {
    if status.is_success() {
        (status, Json(body.clone())).into_response()
    } else {
        (status, "upstream error").into_response()
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

async fn token(
    Extension(shared): Extension<Shared>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let (upstream, counters) = &*shared;
    counters.token.fetch_add(1, Ordering::SeqCst);
    *counters.token_authorization.lock().unwrap() = header_value(&headers, header::AUTHORIZATION);
    *counters.token_body.lock().unwrap() = Some(body);

    json_response(
        upstream.token_status,
        &json!({
            "access_token": FRESH_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "user-read-currently-playing"
        }),
    )
}

async fn currently_playing(Extension(shared): Extension<Shared>, headers: HeaderMap) -> Response {
    let (upstream, counters) = &*shared;
    counters.currently_playing.fetch_add(1, Ordering::SeqCst);
    *counters.bearer.lock().unwrap() = header_value(&headers, header::AUTHORIZATION);

    match &upstream.currently_playing {
        Some(body) => json_response(upstream.currently_playing_status, body),
        None if upstream.currently_playing_status.is_success() => {
            StatusCode::NO_CONTENT.into_response()
        }
        None => upstream.currently_playing_status.into_response(),
    }
}

async fn recently_played(
    Extension(shared): Extension<Shared>,
    axum::extract::RawQuery(query): axum::extract::RawQuery,
) -> Response {
    let (upstream, counters) = &*shared;
    counters.recently_played.fetch_add(1, Ordering::SeqCst);
    *counters.last_query.lock().unwrap() = query;
    json_response(upstream.recently_played_status, &upstream.recently_played)
}

async fn player_summaries(
    Extension(shared): Extension<Shared>,
    axum::extract::RawQuery(query): axum::extract::RawQuery,
) -> Response {
    let (upstream, counters) = &*shared;
    counters.player_summaries.fetch_add(1, Ordering::SeqCst);
    *counters.last_query.lock().unwrap() = query;
    json_response(upstream.player_summaries_status, &upstream.player_summaries)
}

async fn owned_games(
    Extension(shared): Extension<Shared>,
    axum::extract::RawQuery(query): axum::extract::RawQuery,
) -> Response {
    let (upstream, counters) = &*shared;
    counters.owned_games.fetch_add(1, Ordering::SeqCst);
    *counters.last_query.lock().unwrap() = query;
    json_response(upstream.owned_games_status, &upstream.owned_games)
}

/// Starts the fake upstream on an ephemeral local port.
pub async fn start(upstream: Upstream) -> MockUpstream {
    let counters = Arc::new(Counters::default());
    let shared: Shared = Arc::new((upstream, Arc::clone(&counters)));

    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/me/player/currently-playing", get(currently_playing))
        .route("/v1/me/player/recently-played", get(recently_played))
        .route(
            "/ISteamUser/GetPlayerSummaries/v0002/",
            get(player_summaries),
        )
        .route("/IPlayerService/GetOwnedGames/v0001/", get(owned_games))
        .layer(Extension(shared));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base: format!("http://{}", addr),
        counters,
    }
}

/// Writes a config file into `dir` pointing every endpoint at `mock`.
/// Keys in `overrides` replace the defaults.
pub fn write_config(dir: &Path, mock: &MockUpstream, overrides: Value) -> PathBuf {
    let mut config = json!({
        "spotify_client_id": "client-id",
        "spotify_client_secret": "client-secret",
        "spotify_refresh_token": "refresh-token",
        "steam_api_key": "steam-key",
        "steam_id": "76561197960287930",
        "spotify_accounts_url": mock.base,
        "spotify_api_url": format!("{}/v1", mock.base),
        "steam_api_url": mock.base,
        "template_path": "template.html",
        "output_path": "out/index.html",
        "token_cache_path": ".spotify_token_cache",
        "http_timeout_secs": 5
    });

    if let (Some(target), Some(extra)) = (config.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }

    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

pub fn track(name: &str, artists: &[&str], album: &str, duration_ms: i64) -> Value {
    json!({
        "name": name,
        "duration_ms": duration_ms,
        "artists": artists.iter().map(|a| json!({ "name": a })).collect::<Vec<_>>(),
        "album": {
            "name": album,
            "images": [
                { "url": "https://img.example/640.jpg", "width": 640, "height": 640 },
                { "url": "https://img.example/64.jpg", "width": 64, "height": 64 },
                { "url": "https://img.example/300.jpg", "width": 300, "height": 300 }
            ]
        }
    })
}

pub fn player(personastate: i64, game: Option<&str>) -> Value {
    let mut player = json!({
        "steamid": "76561197960287930",
        "personaname": "someone",
        "personastate": personastate
    });
    if let Some(game) = game {
        player["gameextrainfo"] = json!(game);
        player["gameid"] = json!("570");
    }
    json!({ "response": { "players": [player] } })
}
