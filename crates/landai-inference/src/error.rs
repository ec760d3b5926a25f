//! Gemini-specific error classification.
//!
//! The HTTP layer's failures are mapped to a closed code set here, then
//! converted to [`landai_core::Error`] variants at the crate boundary.
//! Nothing above this module inspects status codes or response bodies.

use landai_core::Error;

/// Gemini API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiErrorCode {
    /// Invalid or missing API key.
    AuthenticationError,
    /// Rate/quota limit exhausted. Distinguishable from transient faults
    /// so the caller can fail fast instead of retrying.
    QuotaExceeded,
    /// Transient server-side unavailability. The only retryable code.
    ServerUnavailable,
    /// Malformed request (bad prompt, oversized payload).
    InvalidRequest,
    /// Unknown error.
    Unknown,
}

impl GeminiErrorCode {
    /// Determine the error code from HTTP status and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::AuthenticationError,
            429 => Self::QuotaExceeded,
            400 if body.contains("API key") || body.contains("API_KEY") => {
                Self::AuthenticationError
            }
            400 => Self::InvalidRequest,
            500..=599 => Self::ServerUnavailable,
            _ => Self::Unknown,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServerUnavailable)
    }
}

/// Convert a Gemini error code to a core error.
pub fn to_core_error(code: GeminiErrorCode, message: &str) -> Error {
    match code {
        GeminiErrorCode::AuthenticationError => {
            Error::Config(format!("Gemini authentication failed: {}", message))
        }
        GeminiErrorCode::QuotaExceeded => Error::RateLimited(message.to_string()),
        GeminiErrorCode::ServerUnavailable => Error::Unavailable(message.to_string()),
        GeminiErrorCode::InvalidRequest => Error::InvalidInput(message.to_string()),
        GeminiErrorCode::Unknown => Error::Internal(message.to_string()),
    }
}
