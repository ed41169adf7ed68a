//! # Page Module
//!
//! Turns fetched statuses into the final HTML page.
//!
//! - [`placeholders`] - pure mapping from the two statuses to the named HTML
//!   fragments the template refers to
//! - [`template`] - `{{NAME}}` substitution and the atomic page write

pub mod placeholders;
pub mod template;

pub use placeholders::{PlaceholderMap, build_placeholders};
pub use template::{render, write_page};
