//! Infrastructure layer - Local storage of stories and preferences

pub mod library;
pub mod preferences;
pub mod store;

pub use library::Library;
pub use preferences::{CoverStyle, Preferences};
pub use store::{JsonFileStore, MemoryStore, StoryStore, STORIES_FILE};
