//! Persists the session cookie between process runs.

use crate::api::ApiClient;
use crate::paths::CityBuzzPaths;
use citybuzz_core::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A one-line file holding the `Cookie` header of the last session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = CityBuzzPaths::new(base_path).session_file()?;
        Ok(Self { path })
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved cookie into `api`. Returns whether one was found.
    pub async fn restore(&self, api: &ApiClient) -> Result<bool> {
        let header = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let header = header.trim();
        if header.is_empty() {
            return Ok(false);
        }
        api.import_cookies(header)?;
        tracing::debug!(path = %self.path.display(), "session cookie restored");
        Ok(true)
    }

    /// Writes the client's current cookies, or removes the file if there are none.
    pub async fn save(&self, api: &ApiClient) -> Result<()> {
        match api.export_cookies() {
            Some(header) => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent).await?;
                }
                fs::write(&self.path, header).await?;
                tracing::debug!(path = %self.path.display(), "session cookie saved");
                Ok(())
            }
            None => self.clear().await,
        }
    }

    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
