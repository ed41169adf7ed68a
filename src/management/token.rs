use std::{fmt, io::Error, path::PathBuf};

use chrono::Utc;
use reqwest::Client;

use crate::{
    config::Config,
    spotify,
    types::{Absence, CachedToken, Fetched},
    utils, warning,
};

/// Seconds a cached access token is trusted. Spotify tokens live 3600 s.
pub const TOKEN_TTL_SECS: i64 = 3000;

#[derive(Debug)]
pub enum CacheError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for CacheError {
    fn from(err: Error) -> Self {
        CacheError::IoError(err)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::SerdeError(err)
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::IoError(e) => write!(f, "token cache I/O error: {}", e),
            CacheError::SerdeError(e) => write!(f, "token cache is malformed: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

impl CachedToken {
    pub fn is_fresh(&self, now: i64, ttl_secs: i64) -> bool {
        now - self.timestamp < ttl_secs
    }
}

/// Single-slot key/value store for the Spotify access token with a TTL
/// policy. The slot lives in one JSON file that is always replaced whole.
pub struct TokenCache {
    path: PathBuf,
    ttl_secs: i64,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenCache {
            path: path.into(),
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.paths.token_cache.clone())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub async fn load(&self) -> Result<CachedToken, CacheError> {
        let content = async_fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn store(&self, token: &CachedToken) -> Result<(), CacheError> {
        let json = serde_json::to_string(token)?;
        utils::write_private(&self.path, json.as_bytes()).await?;
        Ok(())
    }

    /// Returns the cached access token if it is still inside the TTL window.
    /// A missing or unreadable cache file counts as empty.
    pub async fn fresh(&self, now: i64) -> Option<String> {
        match self.load().await {
            Ok(cached) if cached.is_fresh(now, self.ttl_secs) => Some(cached.access_token),
            _ => None,
        }
    }

    /// Returns a usable access token, refreshing it when the cached one is
    /// missing or too old.
    ///
    /// A fresh cached token is returned without any network call. Otherwise
    /// the refresh token from `config` is exchanged at the token endpoint and
    /// the result is written back to the cache with the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Absence::NoToken`] when the refresh exchange fails. Failing
    /// to write the cache is only a warning; the new token is still returned.
    pub async fn get_valid_token(&self, client: &Client, config: &Config) -> Fetched<String> {
        if let Some(token) = self.fresh(Utc::now().timestamp()).await {
            return Ok(token);
        }

        let response = spotify::auth::refresh_access_token(client, config)
            .await
            .map_err(|e| {
                let e = e.without_url();
                warning!("[spotify] token refresh failed: {}", e);
                Absence::NoToken(e.to_string())
            })?;

        let cached = CachedToken {
            access_token: response.access_token,
            timestamp: Utc::now().timestamp(),
        };

        if let Err(e) = self.store(&cached).await {
            warning!(
                "[spotify] cannot write token cache {}: {}",
                self.path.display(),
                e
            );
        }

        Ok(cached.access_token)
    }
}
