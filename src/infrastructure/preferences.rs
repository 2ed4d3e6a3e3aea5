//! User preferences for the book

use crate::error::{Result, StorybookError};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// File name of the preferences inside a library directory
pub const PREFERENCES_FILE: &str = "preferences.toml";

pub const DEFAULT_BOOK_TITLE: &str = "Dreams";

/// Cover styles offered for the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoverStyle {
    #[default]
    Dreamy,
    Midnight,
    Forest,
    Wine,
    Charcoal,
    Indigo,
}

impl CoverStyle {
    pub const ALL: [CoverStyle; 6] = [
        CoverStyle::Dreamy,
        CoverStyle::Midnight,
        CoverStyle::Forest,
        CoverStyle::Wine,
        CoverStyle::Charcoal,
        CoverStyle::Indigo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CoverStyle::Dreamy => "dreamy",
            CoverStyle::Midnight => "midnight",
            CoverStyle::Forest => "forest",
            CoverStyle::Wine => "wine",
            CoverStyle::Charcoal => "charcoal",
            CoverStyle::Indigo => "indigo",
        }
    }
}

impl fmt::Display for CoverStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoverStyle {
    type Err = String;

    /// Accepts a cover name or its picker position
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Ok(index) = normalized.parse::<usize>() {
            return Self::ALL
                .get(index)
                .copied()
                .ok_or_else(|| format!("Invalid cover index: {}", index));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| format!("Invalid cover: {}", s))
    }
}

/// Unknown cover names in the file fall back to the default cover
impl<'de> Deserialize<'de> for CoverStyle {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub book_title: String,
    pub cover: CoverStyle,
    pub onboarded: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            book_title: DEFAULT_BOOK_TITLE.to_string(),
            cover: CoverStyle::default(),
            onboarded: false,
        }
    }
}

impl Preferences {
    /// Load from `<dir>/preferences.toml`; a missing file gives defaults
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(PREFERENCES_FILE);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Preferences::default())
            }
            Err(e) => return Err(StorybookError::Io(e)),
        };

        Ok(toml::from_str(&contents)?)
    }

    /// Save to `<dir>/preferences.toml`
    pub fn save_to_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(dir.join(PREFERENCES_FILE), contents)?;

        Ok(())
    }

    /// Back to first-run state
    pub fn reset_onboarding(&mut self) {
        *self = Preferences::default();
    }
}
