//! Application layer - Use cases and orchestration

pub mod init;
pub mod preferences;
pub mod stories;

pub use preferences::PreferencesService;
pub use stories::{StoryRepository, SubscriptionId};
