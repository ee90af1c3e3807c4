//! Loads `ClientConfig` from `config.toml` and the environment.

use crate::paths::CityBuzzPaths;
use citybuzz_core::config::ClientConfig;
use citybuzz_core::error::{CityBuzzError, Result};
use citybuzz_core::i18n::Locale;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_API_URL: &str = "CITYBUZZ_API_URL";
pub const ENV_LOCALE: &str = "CITYBUZZ_LOCALE";

/// Reads the client configuration.
///
/// Precedence: defaults < `config.toml` < environment variables.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    /// Uses the platform config directory.
    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let config_path = CityBuzzPaths::new(base_path).config_file()?;
        Ok(Self { config_path })
    }

    /// Reads a specific file instead of the resolved default.
    pub fn with_file(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the file (a missing file yields defaults) and applies process env overrides.
    pub async fn load(&self) -> Result<ClientConfig> {
        let env: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k == ENV_API_URL || k == ENV_LOCALE)
            .collect();
        self.load_with_env(&env).await
    }

    /// Same as [`load`](Self::load) with an explicit environment, so tests do not
    /// depend on process state.
    pub async fn load_with_env(&self, env: &HashMap<String, String>) -> Result<ClientConfig> {
        let mut config = self.load_file().await?;

        if let Some(url) = env.get(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(locale) = env.get(ENV_LOCALE).filter(|v| !v.trim().is_empty()) {
            config.locale = Locale::from_str(locale.trim()).map_err(|_| {
                CityBuzzError::config(format!("{ENV_LOCALE} must be 'fr' or 'en', got '{locale}'"))
            })?;
        }

        tracing::debug!(path = %self.config_path.display(), api = %config.api_base_url, "configuration loaded");
        Ok(config)
    }

    async fn load_file(&self) -> Result<ClientConfig> {
        let content = match tokio::fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ClientConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            CityBuzzError::config(format!(
                "Failed to parse {}: {}",
                self.config_path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(Some(dir.path())).unwrap();

        let config = service.load_with_env(&HashMap::new()).await.unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn test_file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://buzz.example.org/api/v1\"\ncity = \"caen\"\nmutation_timeout_ms = 2500\n",
        )
        .unwrap();

        let config = ConfigService::with_file(&path)
            .load_with_env(&HashMap::new())
            .await
            .unwrap();
        assert_eq!(config.api_base_url, "https://buzz.example.org/api/v1");
        assert_eq!(config.city, "caen");
        assert_eq!(config.mutation_timeout_ms, 2500);
        assert_eq!(config.locale, Locale::Fr);
    }

    #[tokio::test]
    async fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = \"https://file.example.org/api/v1\"\n").unwrap();

        let env = HashMap::from([
            (ENV_API_URL.to_string(), "http://127.0.0.1:8080/api/v1".to_string()),
            (ENV_LOCALE.to_string(), "EN".to_string()),
        ]);
        let config = ConfigService::with_file(&path).load_with_env(&env).await.unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/api/v1");
        assert_eq!(config.locale, Locale::En);
    }

    #[tokio::test]
    async fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = [").unwrap();

        let err = ConfigService::with_file(&path)
            .load_with_env(&HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CityBuzzError::Config(_)));
    }

    #[tokio::test]
    async fn test_invalid_locale_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let env = HashMap::from([(ENV_LOCALE.to_string(), "de".to_string())]);
        let err = ConfigService::new(Some(dir.path()))
            .unwrap()
            .load_with_env(&env)
            .await
            .unwrap_err();
        assert!(matches!(err, CityBuzzError::Config(_)));
    }
}
