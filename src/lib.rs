//! Status Board Library
//!
//! This library renders a small personal status page from two third-party
//! presence sources: what is playing on Spotify and what is being played on
//! Steam. Results are turned into named placeholders, substituted into a
//! hand-authored HTML template and written atomically to the web root.
//!
//! # Modules
//!
//! - `api` - HTTP handler for the local trigger server
//! - `cli` - Command implementations (`update`, `serve`, `status`, `auth`)
//! - `config` - JSON configuration and `.env` loading
//! - `http` - Shared HTTP client construction and request sending
//! - `management` - Token cache (single-slot TTL store)
//! - `page` - Placeholder builder and template renderer
//! - `server` - Trigger server and update subprocess runner
//! - `spotify` - Spotify Web API client
//! - `steam` - Steam Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Escaping and formatting helpers
//!
//! # Example
//!
//! ```
//! use statusboard::{cli, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> statusboard::Res<()> {
//!     let config = Config::load("config.json").await?;
//!     cli::update(&config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod http;
pub mod management;
pub mod page;
pub mod server;
pub mod spotify;
pub mod steam;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("updated {}", path.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// The message goes to stderr and the process terminates with exit code 1.
/// The trigger server relies on that exit code to tell a failed update from
/// a successful one, so only use this for errors that make the run useless.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Warnings go to stderr. They are used for recoverable problems such as an
/// upstream API being unreachable, where the run continues in a degraded
/// state.
///
/// # Example
///
/// ```
/// warning!("[steam] owned-games error: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
