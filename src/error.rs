//! Error types for storybook

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the story store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store file does not exist yet. Callers loading stories treat this
    /// as an empty collection.
    #[error("Story store not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Story store is corrupt ({}): {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Story store I/O failure ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize stories: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StorageError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Corrupt { .. })
    }
}

/// Main error type for the storybook application
#[derive(Debug, Error)]
pub enum StorybookError {
    #[error("Not a storybook directory: {0}")]
    NotStorybookDirectory(PathBuf),

    #[error("Invalid time reference: {0}")]
    InvalidTimeReference(String),

    #[error("Story not found: {0}")]
    StoryNotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl StorybookError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            StorybookError::NotStorybookDirectory(_) => 2,
            StorybookError::InvalidTimeReference(_) => 3,
            StorybookError::StoryNotFound(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            StorybookError::NotStorybookDirectory(path) => {
                format!(
                    "Not a storybook directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'storybook init' in this directory to start a new book\n\
                    • Navigate to an existing storybook directory\n\
                    • Set STORYBOOK_DIR environment variable or pass --dir",
                    path.display()
                )
            }
            StorybookError::InvalidTimeReference(ref_str) => {
                format!(
                    "Invalid time reference: '{}'\n\n\
                    Valid time references:\n\
                    • today, yesterday, tomorrow\n\
                    • monday, tuesday, ..., sunday (most recent)\n\
                    • last monday, next friday, etc.\n\
                    • Specific dates: YYYY-MM-DD or DD-MM-YYYY\n\
                    • Months (calendar only): YYYY-MM\n\n\
                    Examples:\n\
                    storybook on yesterday\n\
                    storybook on 2025-01-15\n\
                    storybook calendar 2025-01",
                    ref_str
                )
            }
            StorybookError::StoryNotFound(id) => {
                format!(
                    "No story matches id '{}'\n\n\
                    Suggestions:\n\
                    • Use 'storybook list' to see story ids\n\
                    • Use 'storybook search <text>' to find a story",
                    id
                )
            }
            StorybookError::Storage(StorageError::Corrupt { path, .. }) => {
                format!(
                    "{}\n\n\
                    The story file could not be parsed. Move {} aside to start \
                    over, or restore it from a backup.",
                    self,
                    path.display()
                )
            }
            StorybookError::Config(msg) => {
                if msg.starts_with("Unknown preference") {
                    format!(
                        "{}\n\n\
                        Valid keys: book_title, cover, onboarded\n\
                        Example: storybook config book_title 'Summer 2025'",
                        msg
                    )
                } else if msg.starts_with("Invalid cover") {
                    format!(
                        "{}\n\n\
                        Valid covers: dreamy, midnight, forest, wine, charcoal, indigo",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using StorybookError
pub type Result<T> = std::result::Result<T, StorybookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            StorybookError::NotStorybookDirectory(PathBuf::from("/tmp")).exit_code(),
            2
        );
        assert_eq!(
            StorybookError::InvalidTimeReference("x".to_string()).exit_code(),
            3
        );
        assert_eq!(StorybookError::StoryNotFound("abc".to_string()).exit_code(), 4);
        assert_eq!(StorybookError::Config("x".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_not_storybook_directory_suggestion() {
        let err = StorybookError::NotStorybookDirectory(PathBuf::from("/tmp/test"));
        let msg = err.display_with_suggestions();
        assert!(msg.contains("storybook init"));
        assert!(msg.contains("STORYBOOK_DIR"));
        assert!(msg.contains("Suggestions"));
    }

    #[test]
    fn test_invalid_time_reference_examples() {
        let err = StorybookError::InvalidTimeReference("baddate".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("'baddate'"));
        assert!(msg.contains("YYYY-MM-DD"));
        assert!(msg.contains("storybook on yesterday"));
    }

    #[test]
    fn test_story_not_found_suggestions() {
        let err = StorybookError::StoryNotFound("3f2a".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("storybook list"));
        assert!(msg.contains("'3f2a'"));
    }

    #[test]
    fn test_corrupt_store_suggestion() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StorybookError::from(StorageError::Corrupt {
            path: PathBuf::from("/tmp/stories.json"),
            source,
        });
        let msg = err.display_with_suggestions();
        assert!(msg.contains("could not be parsed"));
        assert!(msg.contains("/tmp/stories.json"));
    }

    #[test]
    fn test_config_unknown_key_suggestions() {
        let err = StorybookError::Config("Unknown preference: 'theme'".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("book_title, cover, onboarded"));
    }

    #[test]
    fn test_config_cover_suggestions_only_for_cover_values() {
        let err = StorybookError::Config("Invalid cover: neon".to_string());
        assert!(err.display_with_suggestions().contains("Valid covers"));

        let err = StorybookError::Config(
            "Failed to read image /photos/cover.jpg: No such file or directory".to_string(),
        );
        assert_eq!(
            err.display_with_suggestions(),
            "Failed to read image /photos/cover.jpg: No such file or directory"
        );
    }

    #[test]
    fn test_other_errors_fallback() {
        let err = StorybookError::InvalidTimeReference("x".to_string());
        assert_eq!(err.to_string(), "Invalid time reference: x");
    }
}
