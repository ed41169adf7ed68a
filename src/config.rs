//! Configuration management for the status board.
//!
//! Configuration lives in a single JSON document holding the API credentials,
//! the file paths the pipeline reads and writes, upstream endpoints and
//! timeouts. It is loaded fresh on every run and passed explicitly to every
//! component; nothing in the crate reads configuration from global state.
//!
//! The location of the JSON document is resolved in this order:
//! 1. The `--config` command-line flag
//! 2. The `STATUSBOARD_CONFIG` environment variable (optionally set through a
//!    `.env` file in the local data directory)
//! 3. `config.json` in the local data directory

use std::{
    env, fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const CONFIG_ENV_VAR: &str = "STATUSBOARD_CONFIG";

const DEFAULT_OUTPUT_PATH: &str = "/var/www/html/index.html";
const DEFAULT_TEMPLATE_PATH: &str = "template.html";
const DEFAULT_TOKEN_CACHE_PATH: &str = ".spotify_token_cache";
const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
const DEFAULT_STEAM_API_URL: &str = "https://api.steampowered.com";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_UPDATE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MIN_REFRESH_INTERVAL_SECS: u64 = 5;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is optional. It is mainly useful for pointing
/// `STATUSBOARD_CONFIG` at a config file outside the data directory when the
/// binary is started by a scheduler with a minimal environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/statusboard/.env`
/// - macOS: `~/Library/Application Support/statusboard/.env`
/// - Windows: `%LOCALAPPDATA%/statusboard/.env`
///
/// # Errors
///
/// Returns an error string if the file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if async_fs::metadata(&path).await.is_err() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())?;
    Ok(())
}

/// Returns the platform-specific data directory of the application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("statusboard");
    path
}

/// Resolves which config file to use.
///
/// An explicit path wins, then `STATUSBOARD_CONFIG`, then the default
/// `config.json` in [`data_dir`].
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| data_dir().join("config.json"))
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    SerdeError(PathBuf, serde_json::Error),
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "cannot read config file {}: {}", path.display(), e)
            }
            ConfigError::SerdeError(path, e) => {
                write!(f, "malformed config file {}: {}", path.display(), e)
            }
            ConfigError::Missing(key) => write!(f, "missing required config key `{}`", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Raw shape of the JSON document. Every key is optional here; presence of
/// required keys is checked when building the typed configuration so the
/// error can name the missing key.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    spotify_client_id: Option<String>,
    spotify_client_secret: Option<String>,
    spotify_refresh_token: Option<String>,
    spotify_redirect_uri: Option<String>,
    spotify_accounts_url: Option<String>,
    spotify_api_url: Option<String>,
    steam_api_key: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    steam_id: Option<String>,
    steam_api_url: Option<String>,
    output_path: Option<PathBuf>,
    template_path: Option<PathBuf>,
    token_cache_path: Option<PathBuf>,
    http_timeout_secs: Option<u64>,
    upstream_retries: Option<u32>,
    server_address: Option<String>,
    update_timeout_secs: Option<u64>,
    min_refresh_interval_secs: Option<u64>,
}

// Steam ids are 64-bit numbers and are often pasted into the config unquoted.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or a number, got {}",
            other
        ))),
    }
}

fn required(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn trimmed_url(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

impl RawConfig {
    async fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::SerdeError(path.to_path_buf(), e))
    }
}

/// The registered Spotify application. This is everything the one-time
/// authorization flow needs; the refresh token does not exist yet at that
/// point.
#[derive(Debug, Clone)]
pub struct SpotifyApp {
    pub client_id: String,
    pub client_secret: String,
    pub accounts_url: String,
    pub redirect_uri: String,
}

impl SpotifyApp {
    /// Loads only the Spotify application credentials from `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = RawConfig::read(path.as_ref()).await?;
        Self::from_raw(&raw)
    }

    fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: required("spotify_client_id", raw.spotify_client_id.clone())?,
            client_secret: required("spotify_client_secret", raw.spotify_client_secret.clone())?,
            accounts_url: trimmed_url(
                raw.spotify_accounts_url.clone(),
                DEFAULT_SPOTIFY_ACCOUNTS_URL,
            ),
            redirect_uri: raw
                .spotify_redirect_uri
                .clone()
                .unwrap_or_else(|| DEFAULT_SPOTIFY_REDIRECT_URI.to_string()),
        })
    }

    /// Token exchange endpoint, used for both refresh and code grants.
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url)
    }
}

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub app: SpotifyApp,
    pub refresh_token: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct SteamConfig {
    pub api_key: String,
    pub steam_id: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub template: PathBuf,
    pub output: PathBuf,
    pub token_cache: PathBuf,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout applied to every upstream call.
    pub timeout: Duration,
    /// Extra attempts on `502 Bad Gateway`. Zero means a single attempt.
    pub retries: u32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub update_timeout: Duration,
    pub min_refresh_interval: Duration,
}

/// Fully validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// File the configuration was read from.
    pub source: PathBuf,
    pub spotify: SpotifyConfig,
    pub steam: SteamConfig,
    pub paths: PathsConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Reads and validates the config file at `path`.
    ///
    /// Relative paths inside the document are resolved against the directory
    /// containing the config file, so the template and token cache can live
    /// next to it.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::IoError`] if the file cannot be read
    /// - [`ConfigError::SerdeError`] if it is not valid JSON of the expected shape
    /// - [`ConfigError::Missing`] if a required key is absent or empty
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = RawConfig::read(path).await?;
        Self::from_raw(raw, path)
    }

    /// Builds a configuration from JSON text as if it had been read from `source`.
    pub fn parse(content: &str, source: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = source.as_ref();
        let raw = RawConfig::parse(content, source)?;
        Self::from_raw(raw, source)
    }

    fn from_raw(raw: RawConfig, source: &Path) -> Result<Self, ConfigError> {
        let base = source.parent().unwrap_or_else(|| Path::new("."));
        let resolve = |value: Option<PathBuf>, default: &str| {
            let path = value.unwrap_or_else(|| PathBuf::from(default));
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        };

        let app = SpotifyApp::from_raw(&raw)?;
        let spotify = SpotifyConfig {
            app,
            refresh_token: required("spotify_refresh_token", raw.spotify_refresh_token)?,
            api_url: trimmed_url(raw.spotify_api_url, DEFAULT_SPOTIFY_API_URL),
        };

        let steam = SteamConfig {
            api_key: required("steam_api_key", raw.steam_api_key)?,
            steam_id: required("steam_id", raw.steam_id)?,
            api_url: trimmed_url(raw.steam_api_url, DEFAULT_STEAM_API_URL),
        };

        let paths = PathsConfig {
            template: resolve(raw.template_path, DEFAULT_TEMPLATE_PATH),
            output: resolve(raw.output_path, DEFAULT_OUTPUT_PATH),
            token_cache: resolve(raw.token_cache_path, DEFAULT_TOKEN_CACHE_PATH),
        };

        let http = HttpConfig {
            timeout: Duration::from_secs(raw.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)),
            retries: raw.upstream_retries.unwrap_or(0),
        };

        let server = ServerConfig {
            address: raw
                .server_address
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            update_timeout: Duration::from_secs(
                raw.update_timeout_secs
                    .unwrap_or(DEFAULT_UPDATE_TIMEOUT_SECS),
            ),
            min_refresh_interval: Duration::from_secs(
                raw.min_refresh_interval_secs
                    .unwrap_or(DEFAULT_MIN_REFRESH_INTERVAL_SECS),
            ),
        };

        Ok(Self {
            source: source.to_path_buf(),
            spotify,
            steam,
            paths,
            http,
            server,
        })
    }
}
