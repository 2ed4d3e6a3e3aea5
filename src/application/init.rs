//! Initialize library use case

use crate::error::Result;
use crate::infrastructure::{Library, Preferences, StoryStore};
use std::fs;
use std::path::Path;
use tracing::info;

/// Create a new library at `path` with default preferences and an empty
/// story store.
pub fn init(path: &Path, book_title: Option<&str>) -> Result<Library> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let library = Library::new(path.to_path_buf());
    library.initialize()?;

    let mut preferences = Preferences::default();
    if let Some(title) = book_title {
        preferences.book_title = title.to_string();
    }
    library.save_preferences(&preferences)?;
    library.store().save(&[])?;

    info!(root = %path.display(), "initialized library");
    Ok(library)
}
