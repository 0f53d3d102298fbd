//! Authentication error types.
//!
//! Internal reasons stay distinguishable here (and in the logs); at the HTTP
//! boundary every code collapses to 401.

use axum::http::StatusCode;
use std::fmt;

use super::{HEADER_API_KEY, HEADER_NONCE, HEADER_SIGNATURE, HEADER_TIMESTAMP};

/// Authentication failure codes, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// API-key header absent or empty
    MissingApiKey,
    /// Timestamp header absent, malformed or outside the freshness window
    InvalidTimestamp,
    /// Nonce header absent or empty
    MissingNonce,
    /// (api-key, nonce) already consumed
    NonceReplay,
    /// No credential configured for the api-key
    UnknownApiKey,
    /// Signature header absent, undecodable, or cryptographically wrong
    InvalidSignature,
}

impl AuthErrorCode {
    /// Get error name string.
    pub fn name(self) -> &'static str {
        match self {
            Self::MissingApiKey => "MISSING_API_KEY",
            Self::InvalidTimestamp => "INVALID_TIMESTAMP",
            Self::MissingNonce => "MISSING_NONCE",
            Self::NonceReplay => "NONCE_REPLAY",
            Self::UnknownApiKey => "UNKNOWN_API_KEY",
            Self::InvalidSignature => "INVALID_SIGNATURE",
        }
    }

    /// Get HTTP status code.
    pub fn http_status(self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// The request header to blame, lower-cased.
    pub fn header(self) -> &'static str {
        match self {
            Self::MissingApiKey | Self::UnknownApiKey => HEADER_API_KEY,
            Self::InvalidTimestamp => HEADER_TIMESTAMP,
            Self::MissingNonce | Self::NonceReplay => HEADER_NONCE,
            Self::InvalidSignature => HEADER_SIGNATURE,
        }
    }
}

/// Authentication error with message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl AuthError {
    /// Create a new auth error.
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create error with default message.
    pub fn from_code(code: AuthErrorCode) -> Self {
        let message = match code {
            AuthErrorCode::MissingApiKey => "Missing API key",
            AuthErrorCode::InvalidTimestamp => "Missing or invalid timestamp",
            AuthErrorCode::MissingNonce => "Missing nonce",
            AuthErrorCode::NonceReplay => "Nonce was already used",
            AuthErrorCode::UnknownApiKey => "Unknown API key",
            AuthErrorCode::InvalidSignature => "Signature verification failed",
        };
        Self::new(code, message)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.name(), self.message)
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names() {
        assert_eq!(AuthErrorCode::MissingApiKey.name(), "MISSING_API_KEY");
        assert_eq!(AuthErrorCode::NonceReplay.name(), "NONCE_REPLAY");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(
            AuthErrorCode::InvalidSignature.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthErrorCode::UnknownApiKey.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_blamed_header() {
        assert_eq!(AuthErrorCode::NonceReplay.header(), "x-fbapi-nonce");
        assert_eq!(AuthErrorCode::InvalidTimestamp.header(), "x-fbapi-timestamp");
        assert_eq!(AuthErrorCode::UnknownApiKey.header(), "x-fbapi-key");
    }

    #[test]
    fn test_error_from_code() {
        let err = AuthError::from_code(AuthErrorCode::NonceReplay);
        assert_eq!(err.code, AuthErrorCode::NonceReplay);
        assert!(err.message.contains("already used"));
        assert_eq!(err.to_string(), "NONCE_REPLAY: Nonce was already used");
    }
}
