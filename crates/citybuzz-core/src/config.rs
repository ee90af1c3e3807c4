use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Client settings, read from `config.toml` and overridable from the environment.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the REST API, including the `/api/v1` prefix
    pub api_base_url: String,
    /// Transport-level timeout applied to every HTTP request
    pub request_timeout_ms: u64,
    /// Upper bound for a mutation before its optimistic delta is rolled back
    pub mutation_timeout_ms: u64,
    /// How long a notice stays visible before it auto-dismisses
    pub notice_ttl_ms: u64,
    pub locale: Locale,
    /// City slug used for event listings (`/events/{city}`)
    pub city: String,
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: 15_000,
            mutation_timeout_ms: 10_000,
            notice_ttl_ms: 5_000,
            locale: Locale::default(),
            city: "rouen".to_string(),
            page_size: 10,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn mutation_timeout(&self) -> Duration {
        Duration::from_millis(self.mutation_timeout_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}
