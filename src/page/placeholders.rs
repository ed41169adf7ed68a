use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    types::{MusicStatus, PersonaState, Playback, PresenceStatus},
    utils::{PROGRESS_BAR_WIDTH, fmt_ms, html_esc, progress_bar},
};

pub const SPOTIFY_STATUS: &str = "SPOTIFY_STATUS";
pub const SPOTIFY_BODY: &str = "SPOTIFY_BODY";
pub const STEAM_STATUS: &str = "STEAM_STATUS";
pub const STEAM_BODY: &str = "STEAM_BODY";
pub const ALBUM_ART_CSS: &str = "ALBUM_ART_CSS";
pub const UPDATED: &str = "UPDATED";

/// Every placeholder name the builder fills in.
pub const PLACEHOLDER_NAMES: [&str; 6] = [
    SPOTIFY_STATUS,
    SPOTIFY_BODY,
    STEAM_STATUS,
    STEAM_BODY,
    ALBUM_ART_CSS,
    UPDATED,
];

pub type PlaceholderMap = BTreeMap<String, String>;

const INDENT: &str = "    ";

fn track_lines(music: &MusicStatus) -> Vec<String> {
    vec![
        format!("{INDENT}Track: {}", html_esc(&music.track)),
        format!("{INDENT}Artist: {}", html_esc(&music.artists)),
        format!("{INDENT}Album: {}", html_esc(&music.album)),
    ]
}

fn music_section(music: Option<&MusicStatus>) -> (String, String) {
    let Some(music) = music else {
        return (
            r#"<span class="muted">■</span> IDLE"#.to_string(),
            format!(r#"{INDENT}<span class="muted">Nothing playing.</span>"#),
        );
    };

    match music.playback {
        Playback::Playing => {
            let mut lines = track_lines(music);
            lines.push(format!(
                "{INDENT}Time: {} / {}",
                fmt_ms(music.progress_ms),
                fmt_ms(music.duration_ms)
            ));
            lines.push(format!(
                "{INDENT}[{}]",
                progress_bar(music.progress_ms, music.duration_ms, PROGRESS_BAR_WIDTH)
            ));
            (
                r#"<span class="blink">▶</span> NOW PLAYING"#.to_string(),
                lines.join("\n"),
            )
        }
        Playback::Paused => (
            r#"<span class="muted">⏸</span> PAUSED"#.to_string(),
            track_lines(music).join("\n"),
        ),
        Playback::LastPlayed => (
            r#"<span class="muted">■</span> LAST PLAYED"#.to_string(),
            track_lines(music).join("\n"),
        ),
    }
}

fn presence_section(presence: Option<&PresenceStatus>) -> (String, String) {
    let Some(presence) = presence else {
        return (
            r#"<span class="muted">●</span> UNKNOWN"#.to_string(),
            format!(r#"{INDENT}<span class="muted">Could not fetch Steam data.</span>"#),
        );
    };

    if let Some(game) = &presence.current_game {
        return (
            r#"<span class="steam-playing blink">▶</span> IN-GAME"#.to_string(),
            format!(r#"{INDENT}Playing: <span class="hl">{}</span>"#, html_esc(game)),
        );
    }

    if let Some(game) = &presence.last_played_game {
        return (
            r#"<span class="muted">■</span> LAST PLAYED"#.to_string(),
            format!("{INDENT}Game: {}", html_esc(game)),
        );
    }

    let class = if presence.state == PersonaState::Online {
        "online"
    } else {
        "muted"
    };
    (
        format!(
            r#"<span class="{class}">●</span> {}"#,
            presence.state.label().to_uppercase()
        ),
        format!(r#"{INDENT}<span class="muted">Nothing recent.</span>"#),
    )
}

/// True when `url` can sit inside a CSS `url('…')` without closing it.
fn is_css_safe_url(url: &str) -> bool {
    !url.is_empty()
        && !url.chars().any(|c| {
            c.is_whitespace() || matches!(c, '\'' | '"' | '\\' | '(' | ')' | '<' | '>')
        })
}

fn album_art_css(music: Option<&MusicStatus>) -> String {
    match music {
        Some(music) if is_css_safe_url(&music.album_art_url) => format!(
            "
    .album-ghost {{
        background-image: url('{}');
        background-size: cover;
        background-position: center;
        opacity: 0.035;
        position: fixed;
        top: 0; left: 0; right: 0; bottom: 0;
        pointer-events: none;
        z-index: 0;
        filter: blur(50px);
    }}",
            music.album_art_url
        ),
        _ => String::new(),
    }
}

/// Maps the two fetch results to the page's placeholders.
///
/// Pure and deterministic: the same statuses and `now` always give the same
/// map. Every piece of upstream text (track, artists, album, game names) is
/// HTML-escaped before it is embedded.
///
/// # Music section
///
/// | status | badge |
/// |---|---|
/// | playing | NOW PLAYING, with timer and progress bar |
/// | paused | PAUSED |
/// | last played | LAST PLAYED |
/// | absent | IDLE |
///
/// # Presence section
///
/// | status | badge |
/// |---|---|
/// | in game | IN-GAME |
/// | has a last played game | LAST PLAYED |
/// | neither | persona state, e.g. ONLINE |
/// | absent | UNKNOWN |
pub fn build_placeholders(
    music: Option<&MusicStatus>,
    presence: Option<&PresenceStatus>,
    now: DateTime<Utc>,
) -> PlaceholderMap {
    let (spotify_status, spotify_body) = music_section(music);
    let (steam_status, steam_body) = presence_section(presence);

    let mut placeholders = PlaceholderMap::new();
    placeholders.insert(SPOTIFY_STATUS.to_string(), spotify_status);
    placeholders.insert(SPOTIFY_BODY.to_string(), spotify_body);
    placeholders.insert(STEAM_STATUS.to_string(), steam_status);
    placeholders.insert(STEAM_BODY.to_string(), steam_body);
    placeholders.insert(ALBUM_ART_CSS.to_string(), album_art_css(music));
    placeholders.insert(
        UPDATED.to_string(),
        now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    placeholders
}
