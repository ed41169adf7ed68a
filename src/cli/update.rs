use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{
    Res,
    config::Config,
    http,
    page::{build_placeholders, render, write_page},
    spotify, steam, success,
    types::{Fetched, MusicStatus, PresenceStatus},
};

/// Queries both upstreams one after the other: Spotify first, then Steam.
///
/// Failures never propagate; each side degrades to its [`crate::types::Absence`]
/// on its own.
pub async fn fetch_statuses(
    client: &Client,
    config: &Config,
) -> (Fetched<MusicStatus>, Fetched<PresenceStatus>) {
    let music = spotify::player::fetch_music_status(client, config).await;
    let presence = steam::player::fetch_presence_status(client, config).await;
    (music, presence)
}

/// Regenerates the status page once.
///
/// # Pipeline
///
/// 1. Reads the template (fatal if missing)
/// 2. Fetches the music and presence status
/// 3. Builds the placeholders and renders the template
/// 4. Writes the page atomically to the configured output path
///
/// # Returns
///
/// The path of the written page.
///
/// # Errors
///
/// Only the template read and the page write can fail the run. Upstream
/// problems are logged and show up as IDLE / UNKNOWN sections instead.
pub async fn update(config: &Config) -> Res<PathBuf> {
    let template = async_fs::read_to_string(&config.paths.template)
        .await
        .map_err(|e| {
            format!(
                "cannot read template {}: {}",
                config.paths.template.display(),
                e
            )
        })?;

    let client = http::build_client(&config.http)?;
    let (music, presence) = fetch_statuses(&client, config).await;

    let placeholders = build_placeholders(music.as_ref().ok(), presence.as_ref().ok(), Utc::now());
    let html = render(&template, &placeholders);

    let output = config.paths.output.clone();
    write_page(&output, &html)
        .await
        .map_err(|e| format!("cannot write {}: {}", output.display(), e))?;

    success!("updated {} at {}", output.display(), Utc::now().to_rfc3339());
    Ok(output)
}
