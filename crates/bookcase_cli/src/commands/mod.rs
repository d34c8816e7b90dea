//! CLI command implementations.

pub mod inspect;
pub mod verify;

use bookcase_core::{Catalog, Config};
use std::path::Path;

/// Opens an existing catalog without creating anything on disk.
pub fn open_existing(path: &Path) -> Result<Catalog, Box<dyn std::error::Error>> {
    tracing::debug!(path = %path.display(), "opening catalog without create");
    let config = Config::new().create_if_missing(false).autosave_reviews(false);
    Ok(Catalog::open_with_config(path, config)?)
}
