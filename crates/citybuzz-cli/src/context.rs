use anyhow::{Context, Result};
use citybuzz_application::{CityBuzzClient, Gateways, NoticeKind};
use citybuzz_core::i18n::Locale;
use citybuzz_infrastructure::{
    ApiClient, ConfigService, HttpAuthGateway, HttpEventGateway, HttpNewsGateway,
    HttpPostGateway, SessionStore,
};
use std::path::Path;
use std::sync::Arc;

/// Everything a command needs: the client plus the persisted session.
pub struct CliContext {
    pub client: CityBuzzClient,
    api: ApiClient,
    sessions: SessionStore,
}

impl CliContext {
    /// Loads config, restores the saved session cookie and runs the bootstrap.
    pub async fn load(config_dir: Option<&Path>, locale: Option<Locale>) -> Result<Self> {
        let mut config = ConfigService::new(config_dir)?
            .load()
            .await
            .context("Failed to load configuration")?;
        if let Some(locale) = locale {
            config.locale = locale;
        }
        tracing::debug!(api = %config.api_base_url, locale = %config.locale, "configuration loaded");

        let api = ApiClient::new(&config)?;
        let sessions = SessionStore::new(config_dir)?;
        if let Err(err) = sessions.restore(&api).await {
            tracing::warn!(error = %err, "ignoring unreadable session file");
        }

        let client = CityBuzzClient::new(
            &config,
            Gateways {
                auth: Arc::new(HttpAuthGateway::new(api.clone())),
                posts: Arc::new(HttpPostGateway::new(api.clone())),
                events: Arc::new(HttpEventGateway::new(api.clone())),
                news: Arc::new(HttpNewsGateway::new(api.clone())),
            },
        );
        client.session.initialize().await;

        Ok(Self {
            client,
            api,
            sessions,
        })
    }

    /// Prints pending notices and persists (or forgets) the session cookie.
    pub async fn finish(&self) {
        for notice in self.client.notices.active().await {
            let tag = match notice.kind {
                NoticeKind::Error => "error",
                NoticeKind::Info => "info",
                NoticeKind::LoginPrompt => "login",
            };
            eprintln!("[{tag}] {}", notice.text);
        }

        let persisted = if self.client.session.is_authenticated().await {
            self.sessions.save(&self.api).await
        } else {
            self.sessions.clear().await
        };
        if let Err(err) = persisted {
            tracing::warn!(error = %err, path = %self.sessions.path().display(), "could not persist session");
        }
    }
}
