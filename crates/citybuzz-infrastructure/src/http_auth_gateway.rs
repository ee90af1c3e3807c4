//! `AuthGateway` over the REST API.

use crate::api::{ApiClient, AuthRequirement, Endpoint};
use crate::dto::UserData;
use async_trait::async_trait;
use citybuzz_core::error::{CityBuzzError, Result};
use citybuzz_core::user::{AuthGateway, Credentials, RegisterRequest, User};

#[derive(Clone)]
pub struct HttpAuthGateway {
    api: ApiClient,
}

impl HttpAuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn require_user(data: UserData, endpoint: &str) -> Result<User> {
        data.user.ok_or_else(|| {
            tracing::error!(endpoint, "success response without a user object");
            CityBuzzError::protocol(format!("{endpoint} response is missing the user"))
        })
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn current_user(&self) -> Result<User> {
        let endpoint = Endpoint::get("/users/me").auth(AuthRequirement::Probe);
        let data: UserData = self.api.fetch(endpoint, "user").await?;
        Self::require_user(data, "/users/me")
    }

    async fn login(&self, credentials: &Credentials) -> Result<User> {
        let endpoint = Endpoint::post("/auth/login").public();
        let data: UserData = self.api.submit(endpoint, credentials, "user").await?;
        Self::require_user(data, "/auth/login")
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let endpoint = Endpoint::post("/auth/register").public();
        let data: UserData = self.api.submit(endpoint, request, "user").await?;
        Self::require_user(data, "/auth/register")
    }

    async fn logout(&self) -> Result<()> {
        self.api
            .call(Endpoint::post("/auth/logout").public(), None::<&()>)
            .await
    }
}
