//! Extractors over the contract-validated request.
//!
//! The contract middleware stores the coerced query, path and body in the
//! request extensions; handlers deserialize from there instead of re-parsing
//! the raw request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use crate::pagination::PaginationWindow;
use crate::validation::ValidatedRequest;

/// Typed view of the validated query string (defaults applied).
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

/// Typed view of the validated JSON body.
#[derive(Debug, Clone)]
pub struct ValidatedBody<T>(pub T);

/// Pagination window checked by the guard; the default window when the
/// operation is not paginated.
#[derive(Debug, Clone)]
pub struct Window(pub PaginationWindow);

fn validated(parts: &Parts) -> Result<&ValidatedRequest, ApiError> {
    parts.extensions.get::<ValidatedRequest>().ok_or_else(|| {
        tracing::error!(uri = %parts.uri, "Handler reached without contract validation");
        ApiError::internal()
    })
}

fn decode<T: DeserializeOwned>(value: Value, parts: &Parts) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| {
        // the contract accepted something the handler's types do not model
        tracing::error!(uri = %parts.uri, error = %e, "Validated payload does not deserialize");
        ApiError::internal()
    })
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = validated(parts)?.query.clone();
        decode(query, parts).map(ValidatedQuery)
    }
}

impl<S, T> FromRequestParts<S> for ValidatedBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let body = validated(parts)?.body.clone().unwrap_or(Value::Null);
        decode(body, parts).map(ValidatedBody)
    }
}

impl<S> FromRequestParts<S> for Window
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Window(
            parts
                .extensions
                .get::<PaginationWindow>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}
