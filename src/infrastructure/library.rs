//! Library directory discovery and layout

use crate::error::{Result, StorybookError};
use crate::infrastructure::{JsonFileStore, Preferences};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the hidden directory holding a library's files
pub const LIBRARY_DIR: &str = ".storybook";

/// Environment variable pointing at a library root
pub const LIBRARY_ENV: &str = "STORYBOOK_DIR";

/// A storybook library rooted at a directory containing `.storybook/`
#[derive(Debug, Clone)]
pub struct Library {
    pub root: PathBuf,
}

impl Library {
    pub fn new(root: PathBuf) -> Self {
        Library { root }
    }

    /// Locate the library to use.
    ///
    /// An explicit path wins, then `STORYBOOK_DIR`, then walking up from the
    /// current directory.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::require_initialized(path.to_path_buf());
        }

        if let Ok(root_path) = std::env::var(LIBRARY_ENV) {
            let path = PathBuf::from(root_path);
            if Self::has_library_dir(&path) {
                return Ok(Library::new(path));
            }
            return Err(StorybookError::Config(format!(
                "{} is set to '{}' but no {} directory found. \
                Run 'storybook init' in that directory or unset {}.",
                LIBRARY_ENV,
                path.display(),
                LIBRARY_DIR,
                LIBRARY_ENV
            )));
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    fn require_initialized(path: PathBuf) -> Result<Self> {
        if Self::has_library_dir(&path) {
            Ok(Library::new(path))
        } else {
            Err(StorybookError::NotStorybookDirectory(path))
        }
    }

    /// Walk up from `start` to the first directory holding `.storybook/`
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_library_dir(&current) {
                debug!(root = %current.display(), "found library");
                return Ok(Library::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(StorybookError::NotStorybookDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_library_dir(path: &Path) -> bool {
        path.join(LIBRARY_DIR).is_dir()
    }

    pub fn is_initialized(&self) -> bool {
        Self::has_library_dir(&self.root)
    }

    /// Create the `.storybook/` directory; fails if it already exists
    pub fn initialize(&self) -> Result<()> {
        let dir = self.data_dir();

        if dir.exists() {
            return Err(StorybookError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir_all(&dir)?;
        Ok(())
    }

    /// The `.storybook/` directory
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(LIBRARY_DIR)
    }

    /// Story store for this library
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::in_dir(&self.data_dir())
    }

    pub fn load_preferences(&self) -> Result<Preferences> {
        Preferences::load_from_dir(&self.data_dir())
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        preferences.save_to_dir(&self.data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::STORIES_FILE;
    use std::ffi::OsString;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn env_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvVarRestore {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvVarRestore {
        fn capture(key: &'static str) -> Self {
            Self {
                key,
                previous: std::env::var_os(key),
            }
        }
    }

    impl Drop for EnvVarRestore {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                std::env::set_var(self.key, value);
            } else {
                std::env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn test_initialize_creates_data_dir() {
        let temp = TempDir::new().unwrap();
        let library = Library::new(temp.path().to_path_buf());

        assert!(!library.is_initialized());
        library.initialize().unwrap();

        assert!(library.is_initialized());
        assert!(temp.path().join(LIBRARY_DIR).is_dir());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let temp = TempDir::new().unwrap();
        let library = Library::new(temp.path().to_path_buf());

        library.initialize().unwrap();
        assert!(library.initialize().is_err());
    }

    #[test]
    fn test_store_lives_in_data_dir() {
        let library = Library::new(PathBuf::from("/tmp/book"));
        assert_eq!(
            library.store().path(),
            Path::new("/tmp/book").join(LIBRARY_DIR).join(STORIES_FILE)
        );
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(LIBRARY_DIR)).unwrap();
        let subdir = temp.path().join("photos").join("2025");
        fs::create_dir_all(&subdir).unwrap();

        let library = Library::discover_from(&subdir).unwrap();
        assert_eq!(library.root, temp.path());
    }

    #[test]
    fn test_discover_fails_without_library() {
        let temp = TempDir::new().unwrap();

        match Library::discover_from(temp.path()) {
            Err(StorybookError::NotStorybookDirectory(path)) => assert_eq!(path, temp.path()),
            other => panic!("Expected NotStorybookDirectory, got {:?}", other),
        }
    }

    #[test]
    fn test_locate_explicit_path() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Library::locate(Some(temp.path())),
            Err(StorybookError::NotStorybookDirectory(_))
        ));

        fs::create_dir(temp.path().join(LIBRARY_DIR)).unwrap();
        let library = Library::locate(Some(temp.path())).unwrap();
        assert_eq!(library.root, temp.path());
    }

    #[test]
    fn test_locate_with_env() {
        let _env_lock = env_test_lock().lock().unwrap();
        let _restore = EnvVarRestore::capture(LIBRARY_ENV);

        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(LIBRARY_DIR)).unwrap();
        std::env::set_var(LIBRARY_ENV, temp.path());

        let library = Library::locate(None).unwrap();
        assert_eq!(library.root, temp.path());
    }

    #[test]
    fn test_locate_env_not_initialized() {
        let _env_lock = env_test_lock().lock().unwrap();
        let _restore = EnvVarRestore::capture(LIBRARY_ENV);

        let temp = TempDir::new().unwrap();
        std::env::set_var(LIBRARY_ENV, temp.path());

        match Library::locate(None) {
            Err(StorybookError::Config(msg)) => assert!(msg.contains("no .storybook directory")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }
}
