//! Cookie-session HTTP client for the City-Buzz REST API.

use super::endpoint::{Endpoint, join_url};
use super::envelope;
use citybuzz_core::config::ClientConfig;
use citybuzz_core::error::{CityBuzzError, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::sync::Arc;
use std::time::Duration;

/// Thin wrapper over `reqwest` that speaks the backend's envelope.
///
/// The underlying client keeps a cookie store, so the session cookie set by
/// `POST /auth/login` is replayed on every later request. Cloning is cheap and
/// shares the cookie jar.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    cookies: Arc<Jar>,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Creates a client for the configured base URL.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(cookies.clone())
            .timeout(timeout)
            .build()
            .map_err(|e| CityBuzzError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            cookies,
            base_url: config.api_base_url.clone(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cookies the server has set for the API, as a `Cookie` header value.
    pub fn export_cookies(&self) -> Option<String> {
        let url = self.parsed_base_url().ok()?;
        let header = self.cookies.cookies(&url)?;
        header.to_str().ok().map(str::to_string)
    }

    /// Restores cookies previously returned by [`export_cookies`](Self::export_cookies).
    pub fn import_cookies(&self, header: &str) -> Result<()> {
        let url = self.parsed_base_url()?;
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.cookies.add_cookie_str(pair, &url);
        }
        Ok(())
    }

    fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| CityBuzzError::config(format!("Invalid API base URL '{}': {e}", self.base_url)))
    }

    /// Sends a request whose endpoint schema requires `data`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint, what: &str) -> Result<T> {
        let (status, body) = self.execute(&endpoint, None::<&()>).await?;
        envelope::decode_required(status, endpoint.auth, &body, what)
    }

    /// Sends a JSON body to an endpoint whose schema requires `data`.
    pub async fn submit<B, T>(&self, endpoint: Endpoint, body: &B, what: &str) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let (status, raw) = self.execute(&endpoint, Some(body)).await?;
        envelope::decode_required(status, endpoint.auth, &raw, what)
    }

    /// Sends a request whose `data` may be absent (`null` lists, "no RSVP found").
    pub async fn fetch_optional<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Option<T>> {
        let (status, body) = self.execute(&endpoint, None::<&()>).await?;
        envelope::decode(status, endpoint.auth, &body)
    }

    /// Sends a request and only checks that it succeeded.
    pub async fn call<B>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let (status, raw) = self.execute(&endpoint, body).await?;
        envelope::decode::<IgnoredAny>(status, endpoint.auth, &raw).map(|_| ())
    }

    async fn execute<B>(&self, endpoint: &Endpoint, body: Option<&B>) -> Result<(u16, Vec<u8>)>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = join_url(&self.base_url, &endpoint.path);
        tracing::debug!(method = %endpoint.method, url = %url, "sending request");

        let mut request = self
            .client
            .request(endpoint.method.clone(), &url)
            .query(&endpoint.query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        tracing::debug!(status, endpoint = %endpoint.label(), "received response");
        Ok((status, bytes.to_vec()))
    }

    fn transport_error(&self, endpoint: &Endpoint, err: reqwest::Error) -> CityBuzzError {
        if err.is_timeout() {
            CityBuzzError::timeout(endpoint.label(), self.timeout.as_millis() as u64)
        } else if err.is_decode() {
            CityBuzzError::protocol(err.to_string())
        } else {
            CityBuzzError::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> ClientConfig {
        ClientConfig {
            // Port 9 (discard) is closed on test machines
            api_base_url: "http://127.0.0.1:9/api/v1".to_string(),
            request_timeout_ms: 2_000,
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        let client = ApiClient::new(&unreachable_config()).unwrap();
        let err = client
            .call(Endpoint::post("/auth/logout").public(), None::<&()>)
            .await
            .unwrap_err();

        assert!(
            matches!(err, CityBuzzError::Network(_) | CityBuzzError::Timeout { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_cookies_survive_export_and_import() {
        let first = ApiClient::new(&ClientConfig::default()).unwrap();
        assert!(first.export_cookies().is_none());
        first.import_cookies("session_token=abc123").unwrap();

        let exported = first.export_cookies().unwrap();
        assert_eq!(exported, "session_token=abc123");

        let second = ApiClient::new(&ClientConfig::default()).unwrap();
        second.import_cookies(&exported).unwrap();
        assert_eq!(second.export_cookies().as_deref(), Some("session_token=abc123"));
    }

    #[test]
    fn test_base_url_is_kept_verbatim() {
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    }
}
