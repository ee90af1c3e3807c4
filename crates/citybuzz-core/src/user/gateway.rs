//! Backend contract for authentication.

use super::model::{Credentials, RegisterRequest, User};
use crate::error::Result;
use async_trait::async_trait;

/// Access to the backend's auth endpoints.
///
/// Implementations validate the response shape at the boundary: a success
/// envelope without a user yields `CityBuzzError::Protocol`.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// "Who am I" probe (`GET /users/me`).
    ///
    /// A missing or expired session cookie yields `CityBuzzError::LoginRequired`.
    async fn current_user(&self) -> Result<User>;

    /// `POST /auth/login`. The session cookie is kept by the transport.
    async fn login(&self, credentials: &Credentials) -> Result<User>;

    /// `POST /auth/register`. Does not open a session.
    async fn register(&self, request: &RegisterRequest) -> Result<User>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> Result<()>;
}
