//! Ordered directories searched for configuration files

use std::path::PathBuf;

use log::debug;

use crate::config_file::ConfigError;

/// Directory below the home directory holding user-wide scripts
pub const HOME_CONFIG_DIR: &str = "scriptr";

/// Ordered list of directories to search, highest precedence first
#[derive(Debug, Clone, Default)]
pub struct LookupPaths {
    paths: Vec<PathBuf>,
}

impl LookupPaths {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory to search after all previously added ones.
    ///
    /// Relative paths are made absolute against the current directory. A
    /// directory that does not exist is accepted and simply yields no config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPath` if the path is blank, contains a NUL
    /// byte, cannot be made absolute, or exists but is not a directory.
    pub fn add_lookup_path(&mut self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let path = path.into();
        let invalid = |reason: &str| ConfigError::InvalidPath {
            path: path.clone(),
            reason: reason.to_string(),
        };

        let display = path.to_string_lossy();
        if display.trim().is_empty() {
            return Err(invalid("path is empty"));
        }
        if display.contains('\0') {
            return Err(invalid("path contains a NUL byte"));
        }
        let absolute = std::path::absolute(&path).map_err(|e| invalid(&e.to_string()))?;
        if absolute.exists() && !absolute.is_dir() {
            return Err(invalid("not a directory"));
        }

        debug!("Added lookup path {}", absolute.display());
        self.paths.push(absolute);
        Ok(())
    }

    /// Registered directories in precedence order
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Get the user's home directory from the environment.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_keep_registration_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let mut lookup = LookupPaths::new();
        lookup.add_lookup_path(second.path()).unwrap();
        lookup.add_lookup_path(first.path()).unwrap();
        lookup.add_lookup_path(second.path()).unwrap();
        assert_eq!(
            lookup.paths(),
            &[
                second.path().to_path_buf(),
                first.path().to_path_buf(),
                second.path().to_path_buf()
            ]
        );
    }

    #[test]
    fn test_missing_directory_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let mut lookup = LookupPaths::new();
        lookup.add_lookup_path(dir.path().join("missing")).unwrap();
        assert_eq!(lookup.paths().len(), 1);
    }

    #[test]
    fn test_blank_path_is_rejected() {
        let mut lookup = LookupPaths::new();
        for path in ["", "   "] {
            match lookup.add_lookup_path(path) {
                Err(ConfigError::InvalidPath { reason, .. }) => assert_eq!(reason, "path is empty"),
                other => panic!("Expected ConfigError::InvalidPath, got: {other:?}"),
            }
        }
        assert!(lookup.paths().is_empty());
    }

    #[test]
    fn test_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scriptr.yml");
        std::fs::write(&file, "").unwrap();
        let mut lookup = LookupPaths::new();
        assert!(matches!(
            lookup.add_lookup_path(&file),
            Err(ConfigError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_relative_path_becomes_absolute() {
        let mut lookup = LookupPaths::new();
        lookup.add_lookup_path("some-relative-dir").unwrap();
        assert!(lookup.paths()[0].is_absolute());
    }
}
