//! Path management for City-Buzz configuration files.
//!
//! ```text
//! ~/.config/citybuzz/          # Config directory (platform config dir)
//! ├── config.toml              # Client configuration
//! └── session                  # Session cookie kept between CLI runs
//! ```

use citybuzz_core::error::{CityBuzzError, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "citybuzz";
const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session";

/// Resolves configuration paths, optionally under an explicit base directory.
#[derive(Debug, Clone, Default)]
pub struct CityBuzzPaths {
    base: Option<PathBuf>,
}

impl CityBuzzPaths {
    /// `base` replaces the platform config directory (tests, portable installs).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the City-Buzz configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.join(APP_DIR)),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| CityBuzzError::config("Cannot find config directory")),
        }
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }

    /// Returns the path of the persisted session cookie.
    pub fn session_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(SESSION_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_base() {
        let dir = tempfile::tempdir().unwrap();
        let paths = CityBuzzPaths::new(Some(dir.path()));
        assert_eq!(
            paths.config_file().unwrap(),
            dir.path().join("citybuzz").join("config.toml")
        );
    }
}
