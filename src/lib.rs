//! storybook - a dated journal of stories with photos
//!
//! The library owns the story collection: it keeps stories sorted newest
//! first, saves them as one JSON document, answers search and calendar
//! queries, and computes writing streaks. Front-ends drive it through
//! [`StoryRepository`].

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::StoryRepository;
pub use domain::Story;
pub use error::{StorageError, StorybookError};
pub use infrastructure::{JsonFileStore, StoryStore};
