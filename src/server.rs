use std::{
    fmt, io,
    path::PathBuf,
    process::{ExitStatus, Stdio},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{Extension, Router, http::StatusCode, routing::get};
use tokio::{net::TcpListener, process::Command, sync::Mutex};

use crate::{Res, api, config::Config, info, types::PendingAuthorization, warning};

/// Program and arguments that regenerate the output file.
#[derive(Debug, Clone)]
pub struct UpdateCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl UpdateCommand {
    /// `<this binary> update --config <path>`.
    pub fn current_exe(config: &Config) -> io::Result<Self> {
        Ok(Self {
            program: std::env::current_exe()?,
            args: vec![
                "update".to_string(),
                "--config".to_string(),
                config.source.to_string_lossy().into_owned(),
            ],
        })
    }
}

#[derive(Debug, Clone)]
pub struct TriggerSettings {
    pub command: UpdateCommand,
    pub output: PathBuf,
    /// Upper bound for one run of the update command.
    pub timeout: Duration,
    /// Requests arriving sooner than this after the last successful run are
    /// served the existing file. Zero re-runs on every request.
    pub min_interval: Duration,
}

impl TriggerSettings {
    pub fn from_config(config: &Config) -> io::Result<Self> {
        Ok(Self {
            command: UpdateCommand::current_exe(config)?,
            output: config.paths.output.clone(),
            timeout: config.server.update_timeout,
            min_interval: config.server.min_refresh_interval,
        })
    }
}

#[derive(Debug)]
pub enum TriggerError {
    Timeout(Duration),
    Spawn(io::Error),
    Wait(io::Error),
    Failed(ExitStatus),
    MissingOutput(PathBuf, io::Error),
}

impl TriggerError {
    pub fn status(&self) -> StatusCode {
        match self {
            TriggerError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerError::Timeout(after) => {
                write!(f, "update did not finish within {}s", after.as_secs_f32())
            }
            TriggerError::Spawn(e) => write!(f, "cannot start update: {}", e),
            TriggerError::Wait(e) => write!(f, "lost track of update: {}", e),
            TriggerError::Failed(status) => write!(f, "update failed: {}", status),
            TriggerError::MissingOutput(path, e) => {
                write!(f, "cannot read {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for TriggerError {}

/// Shared state of the trigger server.
///
/// The mutex holds the completion time of the last successful run. Holding
/// it for the whole run keeps at most one update in flight.
pub struct TriggerState {
    settings: TriggerSettings,
    last_run: Mutex<Option<Instant>>,
}

impl TriggerState {
    pub fn new(settings: TriggerSettings) -> Self {
        Self {
            settings,
            last_run: Mutex::new(None),
        }
    }

    /// Runs the update command unless the last run is recent enough, then
    /// returns the bytes of the output file.
    pub async fn refresh_and_read(&self) -> Result<Vec<u8>, TriggerError> {
        {
            let mut last_run = self.last_run.lock().await;
            let due = last_run.is_none_or(|at| at.elapsed() >= self.settings.min_interval);
            if due {
                self.run_update().await?;
                *last_run = Some(Instant::now());
            }
        }

        async_fs::read(&self.settings.output)
            .await
            .map_err(|e| TriggerError::MissingOutput(self.settings.output.clone(), e))
    }

    async fn run_update(&self) -> Result<(), TriggerError> {
        let command = &self.settings.command;
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(TriggerError::Spawn)?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.settings.timeout, child.wait_with_output())
            .await
            .map_err(|_| TriggerError::Timeout(self.settings.timeout))?
            .map_err(TriggerError::Wait)?;

        if output.status.success() {
            return Ok(());
        }

        // stderr may quote upstream responses; it goes to the log only.
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warning!("update stderr:\n{}", stderr.trim_end());
        }
        Err(TriggerError::Failed(output.status))
    }
}

/// Router answering every path with the freshly rendered page.
pub fn trigger_router(state: Arc<TriggerState>) -> Router {
    Router::new()
        .fallback(api::page)
        .layer(Extension(state))
}

/// Serves the trigger endpoint on an already bound listener.
pub async fn serve_trigger(listener: TcpListener, state: Arc<TriggerState>) -> io::Result<()> {
    axum::serve(listener, trigger_router(state)).await
}

/// Binds the configured address and serves until the process is stopped.
pub async fn start_trigger_server(config: &Config, address: Option<String>) -> Res<()> {
    let address = address.unwrap_or_else(|| config.server.address.clone());
    let settings = TriggerSettings::from_config(config)?;
    let state = Arc::new(TriggerState::new(settings));

    let listener = TcpListener::bind(&address).await?;
    info!("Serving {} on http://{}", config.paths.output.display(), listener.local_addr()?);
    serve_trigger(listener, state).await?;
    Ok(())
}

/// Serves the OAuth callback of the authorization flow on `path`.
pub async fn serve_callback(
    listener: TcpListener,
    path: &str,
    state: Arc<Mutex<PendingAuthorization>>,
) -> io::Result<()> {
    let app = Router::new().route(path, get(api::callback).layer(Extension(state)));
    axum::serve(listener, app).await
}
