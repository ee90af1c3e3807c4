//! HTTP adapter for the City-Buzz REST API.
//!
//! - `endpoint`: per-endpoint method, path and auth requirement
//! - `envelope`: `{success, data, error}` decoding and 401 policy
//! - `client`: the cookie-session `reqwest` client

mod client;
pub mod endpoint;
pub mod envelope;

pub use client::ApiClient;
pub use endpoint::{AuthRequirement, Endpoint};
