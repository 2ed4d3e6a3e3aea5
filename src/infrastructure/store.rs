//! Durable storage of the whole story collection

use crate::domain::Story;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the story store inside a library directory
pub const STORIES_FILE: &str = "stories.json";

/// Current on-disk layout version
pub const STORE_VERSION: u32 = 1;

/// Whole-collection persistence for stories.
///
/// Every save replaces the entire collection; there are no partial updates.
pub trait StoryStore {
    /// Read all stories. A store that does not exist yet is empty.
    fn load(&self) -> Result<Vec<Story>, StorageError>;

    /// Replace the stored collection with `stories`
    fn save(&self, stories: &[Story]) -> Result<(), StorageError>;

    /// Remove the store entirely
    fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Serialize)]
struct StoreDocument<'a> {
    version: u32,
    stories: &'a [Story],
}

/// Version field alone, read before the stories so a newer layout is
/// rejected without parsing them
#[derive(Deserialize)]
struct StoreHeader {
    version: u32,
}

#[derive(Deserialize)]
struct StoredDocument {
    stories: Vec<Story>,
}

/// JSON file store with atomic replace on save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        JsonFileStore { path }
    }

    /// Store at `<dir>/stories.json`
    pub fn in_dir(dir: &Path) -> Self {
        JsonFileStore::new(dir.join(STORIES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_bytes(&self) -> Result<Vec<u8>, StorageError> {
        fs::read(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(self.path.clone())
            } else {
                self.io_error(e)
            }
        })
    }

    fn parse(&self, bytes: &[u8]) -> Result<Vec<Story>, StorageError> {
        let corrupt = |source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        };

        // Older stores are a bare array; current ones are the versioned envelope
        let bare = bytes
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|b| *b == b'[');
        if bare {
            return serde_json::from_slice(bytes).map_err(corrupt);
        }

        let StoreHeader { version } = serde_json::from_slice(bytes).map_err(corrupt)?;
        if version > STORE_VERSION {
            return Err(corrupt(<serde_json::Error as serde::de::Error>::custom(
                format!("unsupported store version {version} (newest known is {STORE_VERSION})"),
            )));
        }

        let document: StoredDocument = serde_json::from_slice(bytes).map_err(corrupt)?;
        Ok(document.stories)
    }

    /// Sibling temp path, so the final rename stays on one filesystem
    fn temp_path(&self) -> PathBuf {
        let name = format!(
            "{}.storybook-tmp-{}",
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(STORIES_FILE),
            std::process::id()
        );
        self.path.with_file_name(name)
    }

    fn write_atomic(&self, contents: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path();
        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        });

        // rename replaces the destination in one step on the same filesystem
        let result = written.and_then(|_| fs::rename(&tmp_path, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }
}

impl StoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Story>, StorageError> {
        let bytes = match self.read_bytes() {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(path)) => {
                debug!(path = %path.display(), "no story store yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let stories = self.parse(&bytes)?;
        debug!(path = %self.path.display(), count = stories.len(), "loaded stories");
        Ok(stories)
    }

    fn save(&self, stories: &[Story]) -> Result<(), StorageError> {
        let document = StoreDocument {
            version: STORE_VERSION,
            stories,
        };
        let contents = serde_json::to_vec_pretty(&document).map_err(StorageError::Serialize)?;

        self.write_atomic(&contents).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), count = stories.len(), "saved stories");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared story store");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Store kept in memory only; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    stories: RefCell<Option<Vec<Story>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Start with an existing collection
    pub fn with_stories(stories: Vec<Story>) -> Self {
        MemoryStore {
            stories: RefCell::new(Some(stories)),
        }
    }

    /// Whether anything has been saved (or seeded)
    pub fn exists(&self) -> bool {
        self.stories.borrow().is_some()
    }
}

impl StoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<Story>, StorageError> {
        Ok(self.stories.borrow().clone().unwrap_or_default())
    }

    fn save(&self, stories: &[Story]) -> Result<(), StorageError> {
        *self.stories.borrow_mut() = Some(stories.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.stories.borrow_mut() = None;
        Ok(())
    }
}
