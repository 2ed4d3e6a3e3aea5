//! Preferences management use case

use crate::error::{Result, StorybookError};
use crate::infrastructure::{CoverStyle, Library, Preferences};

/// Keys accepted by [`PreferencesService::get`] and [`PreferencesService::set`]
pub const PREFERENCE_KEYS: [&str; 3] = ["book_title", "cover", "onboarded"];

/// Service for reading and changing book preferences
pub struct PreferencesService {
    library: Library,
}

impl PreferencesService {
    pub fn new(library: Library) -> Self {
        PreferencesService { library }
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let preferences = self.library.load_preferences()?;

        match key {
            "book_title" => Ok(preferences.book_title),
            "cover" => Ok(preferences.cover.to_string()),
            "onboarded" => Ok(preferences.onboarded.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut preferences = self.library.load_preferences()?;

        match key {
            "book_title" => {
                let title = value.trim();
                if title.is_empty() {
                    return Err(StorybookError::Config(
                        "Book title cannot be empty".to_string(),
                    ));
                }
                preferences.book_title = title.to_string();
            }
            "cover" => {
                preferences.cover = value.parse::<CoverStyle>().map_err(StorybookError::Config)?;
            }
            "onboarded" => {
                preferences.onboarded = value.trim().parse::<bool>().map_err(|_| {
                    StorybookError::Config(format!(
                        "Invalid value for onboarded: '{}' (expected true or false)",
                        value
                    ))
                })?;
            }
            _ => return Err(unknown_key(key)),
        }

        self.library.save_preferences(&preferences)
    }

    pub fn list(&self) -> Result<Preferences> {
        self.library.load_preferences()
    }

    /// Restore first-run preferences
    pub fn reset_onboarding(&self) -> Result<()> {
        let mut preferences = self.library.load_preferences()?;
        preferences.reset_onboarding();
        self.library.save_preferences(&preferences)
    }
}

fn unknown_key(key: &str) -> StorybookError {
    StorybookError::Config(format!("Unknown preference: '{}'", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> PreferencesService {
        let library = Library::new(temp.path().to_path_buf());
        library.initialize().unwrap();
        PreferencesService::new(library)
    }

    #[test]
    fn test_get_defaults() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        assert_eq!(service.get("book_title").unwrap(), "Dreams");
        assert_eq!(service.get("cover").unwrap(), "dreamy");
        assert_eq!(service.get("onboarded").unwrap(), "false");
    }

    #[test]
    fn test_set_values() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        service.set("book_title", "  Road Trip ").unwrap();
        service.set("cover", "midnight").unwrap();
        service.set("onboarded", "true").unwrap();

        let prefs = service.list().unwrap();
        assert_eq!(prefs.book_title, "Road Trip");
        assert_eq!(prefs.cover, CoverStyle::Midnight);
        assert!(prefs.onboarded);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        assert!(service.set("book_title", "   ").is_err());
        assert!(service.set("cover", "neon").is_err());
        assert!(service.set("onboarded", "maybe").is_err());
    }

    #[test]
    fn test_unknown_key() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        match service.get("theme") {
            Err(StorybookError::Config(msg)) => assert!(msg.contains("Unknown preference")),
            other => panic!("Expected Config error, got {:?}", other),
        }
        assert!(service.set("theme", "dark").is_err());
    }

    #[test]
    fn test_reset_onboarding() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service.set("onboarded", "true").unwrap();
        service.set("book_title", "Other").unwrap();

        service.reset_onboarding().unwrap();

        assert_eq!(service.list().unwrap(), Preferences::default());
    }
}
