//! # API Module
//!
//! HTTP handlers for the two local servers the application runs.
//!
//! - [`page`] - fallback handler of the trigger server. Every GET, whatever
//!   the path, regenerates the status page through the update command and
//!   answers with the file's bytes.
//! - [`callback`] - OAuth redirect target used once by `statusboard auth`.
//!
//! Handlers receive their shared state through axum's [`axum::Extension`]
//! layer; the routers are assembled in [`crate::server`].

mod callback;
mod page;

pub use callback::callback;
pub use page::page;
