use std::{sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Url};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    Res,
    config::{Config, HttpConfig, SpotifyApp},
    http, info, server,
    types::{PendingAuthorization, TokenResponse},
    utils, warning,
};

/// Permissions needed to read playback state and history.
pub const SCOPES: &str =
    "user-read-currently-playing user-read-playback-state user-read-recently-played";

const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Value of the `Authorization` header for the token endpoint.
pub fn basic_auth_header(app: &SpotifyApp) -> String {
    let credentials = format!("{}:{}", app.client_id, app.client_secret);
    format!("Basic {}", STANDARD.encode(credentials))
}

/// Exchanges the configured refresh token for a new access token.
///
/// Authenticates with HTTP Basic auth built from the client id and secret.
/// Spotify may also return a rotated refresh token; it is ignored here, the
/// old one stays valid.
///
/// # Errors
///
/// Returns the `reqwest::Error` of a failed request, an error status or an
/// undecodable body.
pub async fn refresh_access_token(
    client: &Client,
    config: &Config,
) -> Result<TokenResponse, reqwest::Error> {
    let app = &config.spotify.app;
    let request = client
        .post(app.token_url())
        .header(reqwest::header::AUTHORIZATION, basic_auth_header(app))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", config.spotify.refresh_token.as_str()),
        ]);

    http::send(request, config.http.retries)
        .await?
        .json::<TokenResponse>()
        .await
}

/// Exchanges an authorization code for an access and refresh token.
pub async fn exchange_code(
    client: &Client,
    app: &SpotifyApp,
    code: &str,
) -> Result<TokenResponse, reqwest::Error> {
    let request = client
        .post(app.token_url())
        .header(reqwest::header::AUTHORIZATION, basic_auth_header(app))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", app.redirect_uri.as_str()),
        ]);

    http::send(request, 0).await?.json::<TokenResponse>().await
}

/// Builds the URL the user has to open to grant access.
pub fn authorize_url(app: &SpotifyApp, state: &str) -> Res<Url> {
    let url = Url::parse_with_params(
        &app.authorize_url(),
        &[
            ("client_id", app.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", app.redirect_uri.as_str()),
            ("scope", SCOPES),
            ("state", state),
        ],
    )?;
    Ok(url)
}

/// Runs the one-time OAuth authorization-code flow.
///
/// This is only needed once, to obtain the refresh token that goes into the
/// config file. The periodic update path never calls it.
///
/// # Flow
///
/// 1. Generates a random `state` value
/// 2. Starts a local callback server on the host, port and path of the
///    configured redirect URI
/// 3. Opens the authorization URL in the default browser (or prints it)
/// 4. Waits up to two minutes for the callback to deliver a code
/// 5. Exchanges the code for tokens
///
/// # Errors
///
/// Fails if the redirect URI cannot be bound, the user denies access, the
/// callback never arrives or the code exchange is rejected.
pub async fn authorize(app: &SpotifyApp) -> Res<TokenResponse> {
    let state = utils::generate_state();
    let redirect = Url::parse(&app.redirect_uri)?;
    let host = redirect
        .host_str()
        .ok_or("redirect URI has no host")?
        .to_string();
    let port = redirect
        .port_or_known_default()
        .ok_or("redirect URI has no port")?;

    let shared_state = Arc::new(Mutex::new(PendingAuthorization::new(state.clone())));

    let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;
    let server_state = Arc::clone(&shared_state);
    let callback_path = redirect.path().to_string();
    let server = tokio::spawn(async move {
        if let Err(e) = server::serve_callback(listener, &callback_path, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorize_url(app, &state)?;
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    } else {
        info!("Waiting for authorization in the browser...");
    }

    let code = wait_for_code(Arc::clone(&shared_state)).await;
    server.abort();

    let code = code?;
    let client = http::build_client(&HttpConfig {
        timeout: Duration::from_secs(10),
        retries: 0,
    })?;

    Ok(exchange_code(&client, app, &code).await?)
}

async fn wait_for_code(shared_state: Arc<Mutex<PendingAuthorization>>) -> Res<String> {
    use std::time::Instant;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for Spotify callback...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")?.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let start = Instant::now();
    while start.elapsed() < AUTHORIZATION_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(error) = &lock.error {
            pb.finish_and_clear();
            return Err(format!("authorization was rejected: {}", error).into());
        }
        if let Some(code) = &lock.code {
            pb.finish_and_clear();
            return Ok(code.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    pb.finish_and_clear();
    Err("authorization timed out".into())
}
