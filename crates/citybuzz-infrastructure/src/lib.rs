//! Infrastructure layer for the City-Buzz client.
//!
//! HTTP implementations of the core gateway traits, configuration loading
//! and the persisted session cookie.

pub mod api;
pub mod config_service;
pub mod dto;
pub mod http_auth_gateway;
pub mod http_event_gateway;
pub mod http_news_gateway;
pub mod http_post_gateway;
pub mod paths;
pub mod session_store;

pub use api::ApiClient;
pub use config_service::ConfigService;
pub use http_auth_gateway::HttpAuthGateway;
pub use http_event_gateway::HttpEventGateway;
pub use http_news_gateway::HttpNewsGateway;
pub use http_post_gateway::HttpPostGateway;
pub use paths::CityBuzzPaths;
pub use session_store::SessionStore;
