//! # CLI Module
//!
//! Command implementations behind the `statusboard` binary.
//!
//! ## Commands
//!
//! - [`update`] - Regenerates the status page once. Meant for a cron job or
//!   systemd timer, and run as a subprocess by the trigger server.
//! - [`serve`] - Starts the local trigger server that regenerates and serves
//!   the page on every request.
//! - [`status`] - Prints the current Spotify and Steam status as a table
//!   without touching the page.
//! - [`auth`] - One-time Spotify authorization that prints the refresh token
//!   for the config file.
//!
//! ## Usage Patterns
//!
//! ### Initial Setup
//! ```bash
//! statusboard auth                # Obtain the Spotify refresh token
//! statusboard status              # Check both upstreams answer
//! statusboard update              # Write the page once
//! ```
//!
//! ### Scheduling
//! ```bash
//! */2 * * * * statusboard update --config /etc/statusboard/config.json
//! ```
//!
//! ## Error Handling
//!
//! A broken configuration or an unreadable template aborts the command with
//! a non-zero exit code. An unreachable upstream only degrades its section
//! of the page.

mod auth;
mod serve;
mod status;
mod update;

pub use auth::auth;
pub use serve::serve;
pub use status::{music_row, presence_row, status};
pub use update::fetch_statuses;
pub use update::update;
