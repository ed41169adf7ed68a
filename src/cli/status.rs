use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    cli::update::fetch_statuses,
    config::Config,
    error, http,
    types::{Fetched, MusicStatus, Playback, PresenceStatus, StatusTableRow},
};

/// Table row for the music side.
pub fn music_row(music: &Fetched<MusicStatus>) -> StatusTableRow {
    let (state, detail) = match music {
        Ok(m) => {
            let state = match m.playback {
                Playback::Playing => "now playing",
                Playback::Paused => "paused",
                Playback::LastPlayed => "last played",
            };
            (state.to_string(), format!("{} - {}", m.artists, m.track))
        }
        Err(absence) => ("idle".to_string(), absence.to_string()),
    };

    StatusTableRow {
        source: "Spotify".to_string(),
        state,
        detail,
    }
}

/// Table row for the presence side.
pub fn presence_row(presence: &Fetched<PresenceStatus>) -> StatusTableRow {
    let (state, detail) = match presence {
        Ok(p) => match (&p.current_game, &p.last_played_game) {
            (Some(game), _) => ("in-game".to_string(), game.clone()),
            (None, Some(game)) => (p.state.label().to_lowercase(), format!("last played {}", game)),
            (None, None) => (p.state.label().to_lowercase(), "nothing recent".to_string()),
        },
        Err(absence) => ("unknown".to_string(), absence.to_string()),
    };

    StatusTableRow {
        source: "Steam".to_string(),
        state,
        detail,
    }
}

/// Prints what the next page update would show, without writing the page.
pub async fn status(config: &Config) {
    let client = match http::build_client(&config.http) {
        Ok(client) => client,
        Err(e) => error!("Cannot build HTTP client. Err: {}", e),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching Spotify and Steam status...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let (music, presence) = fetch_statuses(&client, config).await;
    pb.finish_and_clear();

    let table = Table::new(vec![music_row(&music), presence_row(&presence)]);
    println!("{}", table);
}
