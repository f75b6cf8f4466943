//! URL and keyword naming helpers.
//!
//! Guesses an image extension from a link's last path segment and derives
//! directory-safe names from search keywords.

mod extension;
mod path;
mod sanitize;

pub use extension::{extension_from_link, DEFAULT_EXTENSION};
pub use path::last_path_segment;
pub use sanitize::sanitize_keyword;
