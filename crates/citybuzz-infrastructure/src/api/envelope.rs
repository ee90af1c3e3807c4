//! Response envelope decoding.
//!
//! The backend wraps every payload as `{success, message?, data?, error?}`.
//! This is the single place where that shape is checked; everything above it
//! receives typed data or a typed error.

use super::endpoint::AuthRequirement;
use citybuzz_core::error::{CityBuzzError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

const GENERIC_ERROR: &str = "An error occurred";

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error-only view of an envelope, used for non-2xx bodies whose `data` we ignore.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a failure status to the client error taxonomy.
pub fn classify_failure(status: u16, auth: AuthRequirement, message: String) -> CityBuzzError {
    match (status, auth) {
        (401, AuthRequirement::Probe) => CityBuzzError::LoginRequired,
        (401, AuthRequirement::Optional) => CityBuzzError::Auth(message),
        (401, AuthRequirement::Required) => CityBuzzError::SessionExpired,
        (status, _) => CityBuzzError::api(status, message),
    }
}

/// Decodes a raw response into the envelope's `data`.
///
/// Returns `Ok(None)` for a successful envelope without data (or an empty
/// 2xx body). Unparsable bodies on 2xx are `Protocol` errors.
pub fn decode<T: DeserializeOwned>(
    status: u16,
    auth: AuthRequirement,
    body: &[u8],
) -> Result<Option<T>> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_ERROR.to_string());
        return Err(classify_failure(status, auth, message));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)
        .map_err(|e| CityBuzzError::protocol(format!("unexpected response shape: {e}")))?;

    if !envelope.success {
        let message = envelope
            .error
            .or(envelope.message)
            .unwrap_or_else(|| GENERIC_ERROR.to_string());
        return Err(CityBuzzError::api(status, message));
    }

    Ok(envelope.data)
}

/// Like [`decode`], but the endpoint's schema requires `data`.
pub fn decode_required<T: DeserializeOwned>(
    status: u16,
    auth: AuthRequirement,
    body: &[u8],
    what: &str,
) -> Result<T> {
    decode(status, auth, body)?
        .ok_or_else(|| CityBuzzError::protocol(format!("response is missing {what}")))
}
