//! Authentication pipeline and its axum middleware.
//!
//! Fixed-order checks, each able to short-circuit:
//!
//! 1. api-key header present and non-empty
//! 2. timestamp header parses and lies within the freshness window
//! 3. nonce header present, then (api-key, nonce) recorded in the nonce store
//! 4. credential resolved, canonical string rebuilt, signature verified
//!
//! The nonce is consumed at step 3 whatever step 4 decides, so a retried
//! request that failed signature verification is still a replay.

use axum::body::{Body, to_bytes};
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, Method, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::canonical::canonical_string;
use super::error::{AuthError, AuthErrorCode};
use super::models::AuthenticatedClient;
use super::nonce_store::NonceStore;
use super::repository::CredentialRepository;
use super::{HEADER_API_KEY, HEADER_NONCE, HEADER_SIGNATURE, HEADER_TIMESTAMP};
use crate::gateway::error::ApiError;
use crate::signing::{self, Signature, SigningError};

/// Runs the four authentication checks against one request.
pub struct AuthPipeline {
    nonces: Arc<dyn NonceStore>,
    credentials: CredentialRepository,
    /// Allowed clock skew, both past and future
    timestamp_window_ms: i64,
}

impl AuthPipeline {
    pub fn new(
        nonces: Arc<dyn NonceStore>,
        credentials: CredentialRepository,
        timestamp_window_ms: i64,
    ) -> Self {
        Self {
            nonces,
            credentials,
            timestamp_window_ms,
        }
    }

    pub fn nonce_store(&self) -> &Arc<dyn NonceStore> {
        &self.nonces
    }

    pub fn timestamp_window_ms(&self) -> i64 {
        self.timestamp_window_ms
    }

    /// Authenticate a request. `now_ms` is injected so callers control the clock.
    pub fn authenticate(
        &self,
        headers: &HeaderMap,
        method: &Method,
        path_and_query: &str,
        body: &[u8],
        now_ms: i64,
    ) -> Result<AuthenticatedClient, AuthError> {
        // Step 1: api-key
        let api_key = header_value(headers, HEADER_API_KEY)
            .ok_or_else(|| AuthError::from_code(AuthErrorCode::MissingApiKey))?;

        // Step 2: timestamp freshness
        let timestamp = header_value(headers, HEADER_TIMESTAMP)
            .ok_or_else(|| AuthError::new(AuthErrorCode::InvalidTimestamp, "Missing timestamp"))?;
        validate_timestamp(timestamp, now_ms, self.timestamp_window_ms)?;

        // Step 3: nonce uniqueness
        let nonce = header_value(headers, HEADER_NONCE)
            .ok_or_else(|| AuthError::from_code(AuthErrorCode::MissingNonce))?;
        if !self.nonces.check_and_record(api_key, nonce, now_ms) {
            return Err(AuthError::from_code(AuthErrorCode::NonceReplay));
        }

        // Step 4: signature
        let credential = self
            .credentials
            .resolve(api_key)
            .ok_or_else(|| AuthError::from_code(AuthErrorCode::UnknownApiKey))?;
        let encoded = header_value(headers, HEADER_SIGNATURE).ok_or_else(|| {
            AuthError::new(AuthErrorCode::InvalidSignature, "Missing signature")
        })?;
        let message = canonical_string(timestamp, nonce, method.as_str(), path_and_query, body);

        let outcome = Signature::decode(encoded, credential.encoding).and_then(|signature| {
            signing::verify(
                &message,
                &credential.key,
                signature.as_bytes(),
                &credential.algorithm,
            )
        });
        if let Err(e) = outcome {
            tracing::warn!(
                api_key,
                algorithm = %credential.algorithm,
                reason = %e,
                unsupported_algorithm = matches!(e, SigningError::AlgorithmNotSupported(_)),
                "Signature check failed"
            );
            return Err(AuthError::from_code(AuthErrorCode::InvalidSignature));
        }

        Ok(AuthenticatedClient {
            api_key: api_key.to_string(),
        })
    }
}

/// Check that `timestamp` is an integer within `window_ms` of `now_ms`.
pub fn validate_timestamp(timestamp: &str, now_ms: i64, window_ms: i64) -> Result<i64, AuthError> {
    let ts: i64 = timestamp.trim().parse().map_err(|_| {
        AuthError::new(
            AuthErrorCode::InvalidTimestamp,
            "Timestamp must be an integer number of milliseconds",
        )
    })?;

    if now_ms.abs_diff(ts) > window_ms.unsigned_abs() {
        return Err(AuthError::new(
            AuthErrorCode::InvalidTimestamp,
            format!("Timestamp must be within {}ms of server time", window_ms),
        ));
    }

    Ok(ts)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Authentication state shared across requests.
#[derive(Clone)]
pub struct AuthState {
    pub pipeline: Arc<AuthPipeline>,
    /// Bodies are buffered to be signed over; larger ones are rejected
    pub max_body_bytes: usize,
}

/// Axum middleware for API authentication.
///
/// Buffers the body, runs the pipeline with the system clock and injects
/// [`AuthenticatedClient`] into request extensions.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let bytes = match to_bytes(body, auth.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Request body rejected");
            return ApiError::payload_too_large(auth.max_body_bytes).into_response();
        }
    };

    let path_and_query = parts
        .extensions
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri)
        .unwrap_or(&parts.uri)
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    match auth
        .pipeline
        .authenticate(&parts.headers, &parts.method, &path_and_query, &bytes, now_ms())
    {
        Ok(client) => {
            tracing::debug!(api_key = %client.api_key, method = %parts.method, path = %path_and_query, "Authenticated");
            parts.extensions.insert(client);
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        Err(e) => {
            tracing::warn!(
                api_key = header_value(&parts.headers, HEADER_API_KEY).unwrap_or("-"),
                code = e.code.name(),
                reason = %e.message,
                method = %parts.method,
                path = %path_and_query,
                "Authentication failed"
            );
            ApiError::from(e).into_response()
        }
    }
}
