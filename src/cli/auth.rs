use std::path::Path;

use crate::{config::SpotifyApp, error, info, spotify, success, warning};

pub async fn auth(config_path: &Path) {
    let app = match SpotifyApp::load(config_path).await {
        Ok(app) => app,
        Err(e) => error!("Cannot load Spotify credentials. Err: {}", e),
    };

    let token = match spotify::auth::authorize(&app).await {
        Ok(token) => token,
        Err(e) => error!("Authorization failed. Err: {}", e),
    };

    match token.refresh_token {
        Some(refresh_token) => {
            success!("Authorization successful!");
            info!(
                "Add this to {}:\n  \"spotify_refresh_token\": \"{}\"",
                config_path.display(),
                refresh_token
            );
        }
        None => warning!("Spotify did not return a refresh token."),
    }
}
