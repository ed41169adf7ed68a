use std::{
    io,
    path::{Path, PathBuf},
};

use rand::{Rng, distr::Alphanumeric};

pub const PROGRESS_BAR_WIDTH: usize = 30;

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Random alphanumeric value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn html_esc(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Formats milliseconds as `m:ss`.
pub fn fmt_ms(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Renders a fixed-width gauge of `progress` out of `duration`.
///
/// A non-positive duration yields a neutral bar instead of dividing by zero.
pub fn progress_bar(progress_ms: i64, duration_ms: i64, width: usize) -> String {
    if duration_ms <= 0 {
        return "─".repeat(width);
    }

    let ratio = (progress_ms as f64 / duration_ms as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).floor() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

// Unique per write: a cron run and a trigger-server run may write the same
// file at once.
fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(format!(".{}.tmp", random_alphanumeric(12)));
    PathBuf::from(tmp)
}

async fn write_via_temp(path: &Path, contents: &[u8], private: bool) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            async_fs::create_dir_all(parent).await?;
        }
    }

    let tmp = temp_path(path);
    let result = write_and_rename(&tmp, path, contents, private).await;
    if result.is_err() {
        let _ = async_fs::remove_file(&tmp).await;
    }
    result
}

async fn write_and_rename(tmp: &Path, path: &Path, contents: &[u8], private: bool) -> io::Result<()> {
    async_fs::write(tmp, contents).await?;

    #[cfg(unix)]
    if private {
        use std::os::unix::fs::PermissionsExt;
        async_fs::set_permissions(tmp, std::fs::Permissions::from_mode(0o600)).await?;
    }
    #[cfg(not(unix))]
    let _ = private;

    async_fs::rename(tmp, path).await
}

/// Writes `contents` to a uniquely named temp file next to `path` and renames
/// it into place, so readers only ever see the old or the new file. With
/// concurrent writers the last rename wins.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    write_via_temp(path, contents, false).await
}

/// Like [`write_atomic`], but the file is only readable by its owner.
pub async fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    write_via_temp(path, contents, true).await
}
