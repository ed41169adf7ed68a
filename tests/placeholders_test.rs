use chrono::{TimeZone, Utc};
use statusboard::{
    page::placeholders::*,
    types::{MusicStatus, PersonaState, Playback, PresenceStatus},
};

fn music(playback: Playback) -> MusicStatus {
    MusicStatus {
        track: "Song <One>".to_string(),
        artists: "Band & Friends".to_string(),
        album: "\"Quoted\" Album".to_string(),
        album_art_url: "https://i.scdn.co/image/small".to_string(),
        progress_ms: 15_000,
        duration_ms: 30_000,
        playback,
    }
}

fn presence(
    state: PersonaState,
    current_game: Option<&str>,
    last_played_game: Option<&str>,
) -> PresenceStatus {
    PresenceStatus {
        state,
        current_game: current_game.map(str::to_string),
        last_played_game: last_played_game.map(str::to_string),
    }
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap()
}

#[test]
fn test_all_placeholders_present() {
    let map = build_placeholders(None, None, now());
    for name in PLACEHOLDER_NAMES {
        assert!(map.contains_key(name), "missing {name}");
    }
    assert_eq!(map.len(), PLACEHOLDER_NAMES.len());
}

#[test]
fn test_updated_timestamp_format() {
    let map = build_placeholders(None, None, now());
    assert_eq!(map[UPDATED], "2024-03-09 07:05:03 UTC");
}

#[test]
fn test_builder_is_deterministic() {
    let m = music(Playback::Playing);
    let p = presence(PersonaState::Online, Some("Dota 2"), None);
    assert_eq!(
        build_placeholders(Some(&m), Some(&p), now()),
        build_placeholders(Some(&m), Some(&p), now())
    );
}

#[test]
fn test_now_playing_badge_and_body() {
    let m = music(Playback::Playing);
    let map = build_placeholders(Some(&m), None, now());

    assert!(map[SPOTIFY_STATUS].contains("NOW PLAYING"));
    assert!(map[SPOTIFY_STATUS].contains(r#"class="blink""#));

    let body = &map[SPOTIFY_BODY];
    assert!(body.contains("    Track: Song &lt;One&gt;"));
    assert!(body.contains("    Artist: Band &amp; Friends"));
    assert!(body.contains("    Album: &quot;Quoted&quot; Album"));
    assert!(body.contains("    Time: 0:15 / 0:30"));
    assert!(body.contains(&format!("[{}{}]", "█".repeat(15), "░".repeat(15))));
    assert_eq!(body.lines().count(), 5);
}

#[test]
fn test_paused_badge_has_no_timer() {
    let m = music(Playback::Paused);
    let map = build_placeholders(Some(&m), None, now());

    assert!(map[SPOTIFY_STATUS].contains("PAUSED"));
    assert!(!map[SPOTIFY_BODY].contains("Time:"));
    assert_eq!(map[SPOTIFY_BODY].lines().count(), 3);
}

#[test]
fn test_last_played_badge() {
    let m = music(Playback::LastPlayed);
    let map = build_placeholders(Some(&m), None, now());

    assert!(map[SPOTIFY_STATUS].contains("LAST PLAYED"));
    assert!(!map[SPOTIFY_STATUS].contains("NOW PLAYING"));
    assert!(map[SPOTIFY_BODY].contains("Track: Song &lt;One&gt;"));
}

#[test]
fn test_idle_when_music_absent() {
    let map = build_placeholders(None, None, now());

    assert!(map[SPOTIFY_STATUS].contains("IDLE"));
    assert!(map[SPOTIFY_BODY].contains("Nothing playing."));
    assert_eq!(map[ALBUM_ART_CSS], "");
}

#[test]
fn test_playing_with_zero_duration_does_not_panic() {
    let mut m = music(Playback::Playing);
    m.progress_ms = 0;
    m.duration_ms = 0;
    let map = build_placeholders(Some(&m), None, now());

    assert!(map[SPOTIFY_BODY].contains(&format!("[{}]", "─".repeat(30))));
}

#[test]
fn test_album_art_css() {
    let m = music(Playback::Paused);
    let css = &build_placeholders(Some(&m), None, now())[ALBUM_ART_CSS];

    assert!(css.contains(".album-ghost {"));
    assert!(css.contains("background-image: url('https://i.scdn.co/image/small');"));
    assert!(css.contains("opacity: 0.035;"));
    assert!(css.contains("position: fixed;"));
    assert!(css.contains("pointer-events: none;"));
    assert!(css.contains("filter: blur(50px);"));
}

#[test]
fn test_album_art_css_empty_without_art() {
    let mut m = music(Playback::Playing);
    m.album_art_url = String::new();
    assert_eq!(build_placeholders(Some(&m), None, now())[ALBUM_ART_CSS], "");
}

#[test]
fn test_album_art_css_rejects_breaking_url() {
    let mut m = music(Playback::Playing);
    m.album_art_url = "https://evil.example/x');}body{display:none".to_string();
    assert_eq!(build_placeholders(Some(&m), None, now())[ALBUM_ART_CSS], "");
}

#[test]
fn test_in_game_badge() {
    let p = presence(PersonaState::Online, Some("Half-Life <2>"), None);
    let map = build_placeholders(None, Some(&p), now());

    assert!(map[STEAM_STATUS].contains("IN-GAME"));
    assert!(map[STEAM_STATUS].contains("steam-playing blink"));
    assert_eq!(
        map[STEAM_BODY],
        r#"    Playing: <span class="hl">Half-Life &lt;2&gt;</span>"#
    );
}

#[test]
fn test_last_played_game_badge() {
    let p = presence(PersonaState::Away, None, Some("Portal & Friends"));
    let map = build_placeholders(None, Some(&p), now());

    assert!(map[STEAM_STATUS].contains("LAST PLAYED"));
    assert_eq!(map[STEAM_BODY], "    Game: Portal &amp; Friends");
}

#[test]
fn test_online_without_games() {
    let p = presence(PersonaState::Online, None, None);
    let map = build_placeholders(None, Some(&p), now());

    assert_eq!(map[STEAM_STATUS], r#"<span class="online">●</span> ONLINE"#);
    assert!(map[STEAM_BODY].contains("Nothing recent."));
}

#[test]
fn test_other_states_are_muted() {
    let p = presence(PersonaState::Snooze, None, None);
    let map = build_placeholders(None, Some(&p), now());

    assert_eq!(map[STEAM_STATUS], r#"<span class="muted">●</span> SNOOZE"#);
}

#[test]
fn test_unknown_when_presence_absent() {
    let map = build_placeholders(None, None, now());

    assert!(map[STEAM_STATUS].contains("UNKNOWN"));
    assert!(map[STEAM_BODY].contains("Could not fetch Steam data."));
}

#[test]
fn test_persona_state_mapping() {
    assert_eq!(PersonaState::from_code(0), PersonaState::Offline);
    assert_eq!(PersonaState::from_code(1), PersonaState::Online);
    assert_eq!(PersonaState::from_code(2), PersonaState::Busy);
    assert_eq!(PersonaState::from_code(3), PersonaState::Away);
    assert_eq!(PersonaState::from_code(4), PersonaState::Snooze);
    assert_eq!(PersonaState::from_code(42), PersonaState::Offline);
    assert_eq!(PersonaState::from_code(-1), PersonaState::Offline);
}

#[test]
fn test_trade_and_play_states_display_as_online() {
    let online = PersonaState::from_code(1).label();
    assert_eq!(PersonaState::from_code(5).label(), online);
    assert_eq!(PersonaState::from_code(6).label(), online);

    let badge = |code| {
        let p = presence(PersonaState::from_code(code), None, None);
        build_placeholders(None, Some(&p), now())[STEAM_STATUS].clone()
    };
    assert_eq!(badge(5), badge(1));
    assert_eq!(badge(6), badge(1));
}
