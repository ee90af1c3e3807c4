//! Error types for the City-Buzz client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire City-Buzz client.
///
/// Every failure that crosses a layer boundary is converted into one of these
/// variants, so the application layer can decide how to surface it without
/// inspecting transport details.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CityBuzzError {
    /// Credentials were rejected, or the login response carried no identity
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The action needs a logged-in user and the session is anonymous
    #[error("Login required")]
    LoginRequired,

    /// A must-authenticate endpoint answered 401
    #[error("Session expired")]
    SessionExpired,

    /// Input rejected before any request was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// The same action is already waiting for the server
    #[error("Already in flight: {operation}")]
    AlreadyInFlight { operation: String },

    /// Server answered with a failure status or `success: false`
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connection refused, DNS, TLS...)
    #[error("Network error: {0}")]
    Network(String),

    /// The response did not match the schema expected for the endpoint
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A request did not settle in time
    #[error("Timed out after {after_ms}ms: {operation}")]
    Timeout { operation: String, after_ms: u64 },

    /// Entity not found in the local collection
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CityBuzzError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an AlreadyInFlight error
    pub fn in_flight(operation: impl Into<String>) -> Self {
        Self::AlreadyInFlight {
            operation: operation.into(),
        }
    }

    /// Creates an Api error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates a Timeout error
    pub fn timeout(operation: impl Into<String>, after_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            after_ms,
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is a LoginRequired error
    pub fn is_login_required(&self) -> bool {
        matches!(self, Self::LoginRequired)
    }

    /// Check if this is a SessionExpired error
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an AlreadyInFlight error
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::AlreadyInFlight { .. })
    }

    /// Check if this is a Timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this is a Protocol error
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for errors raised locally before any request left the client.
    ///
    /// These are never surfaced as failure notices: the caller already knows
    /// why nothing happened.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::AlreadyInFlight { .. } | Self::LoginRequired
        )
    }

    /// Message suitable for showing next to a form.
    ///
    /// Server-provided messages are passed through, everything else falls back
    /// to the `Display` text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(message) | Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CityBuzzError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CityBuzzError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CityBuzzError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CityBuzzError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for CityBuzzError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, CityBuzzError>`.
pub type Result<T> = std::result::Result<T, CityBuzzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_side_errors() {
        assert!(CityBuzzError::validation("empty").is_client_side());
        assert!(CityBuzzError::in_flight("comment").is_client_side());
        assert!(CityBuzzError::LoginRequired.is_client_side());
        assert!(!CityBuzzError::network("refused").is_client_side());
        assert!(!CityBuzzError::SessionExpired.is_client_side());
    }

    #[test]
    fn test_user_message_passes_server_text_through() {
        let err = CityBuzzError::api(403, "You can only edit your own posts");
        assert_eq!(err.user_message(), "You can only edit your own posts");

        let err = CityBuzzError::auth("Invalid credentials");
        assert_eq!(err.user_message(), "Invalid credentials");

        let err = CityBuzzError::timeout("like post", 10_000);
        assert_eq!(err.user_message(), "Timed out after 10000ms: like post");
    }

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CityBuzzError = io.into();
        match err {
            CityBuzzError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
