//! Contract enforcement around every routed handler.
//!
//! Runs after authentication: pagination guard, then request validation
//! (headers, path, query string, body), then the handler, then response
//! validation. A response that breaks its own schema never reaches the wire.

use axum::{
    body::{Body, to_bytes},
    extract::{FromRequestParts, MatchedPath, Query, RawPathParams, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use super::error::ApiError;
use super::state::AppState;
use crate::pagination;
use crate::validation::{CompiledOperation, RequestPart, ValidationViolation};

pub async fn contract_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let operation = parts
        .extensions
        .get::<MatchedPath>()
        .and_then(|matched| state.registry.operation(&parts.method, matched.as_str()));
    let Some(operation) = operation else {
        tracing::warn!(method = %parts.method, uri = %parts.uri, "Route has no contract operation");
        return next.run(Request::from_parts(parts, body)).await;
    };

    let path_params: Vec<(String, String)> =
        match RawPathParams::from_request_parts(&mut parts, &state).await {
            Ok(params) => params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            Err(_) => Vec::new(),
        };

    let pairs = match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
        Ok(Query(pairs)) => pairs,
        Err(e) => {
            return reject(
                operation,
                ValidationViolation::new(
                    RequestPart::Querystring,
                    None,
                    "query",
                    format!("Request schema validation error: {}", e),
                ),
            );
        }
    };
    let query = operation.coerce_query(&pairs);

    if operation.is_paginated() {
        match pagination::guard(&query) {
            Ok(window) => {
                parts.extensions.insert(window);
            }
            Err(e) => return reject(operation, e.into()),
        }
    }

    // the auth layer already bounded the body size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read request body");
            return ApiError::internal().into_response();
        }
    };

    match operation.validate_request(&parts.headers, &path_params, query, &bytes) {
        Ok(validated) => {
            parts.extensions.insert(validated);
        }
        Err(violation) => return reject(operation, violation),
    }

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;
    check_response(operation, response).await
}

fn reject(operation: &CompiledOperation, violation: ValidationViolation) -> Response {
    tracing::debug!(
        method = %operation.method(),
        url = operation.path_template(),
        part = %violation.request_part,
        property = ?violation.property_path,
        keyword = %violation.keyword,
        "Request rejected by contract"
    );
    ApiError::from(violation).into_response()
}

async fn check_response(operation: &CompiledOperation, response: Response) -> Response {
    let status = response.status().as_u16();
    if !operation.declares_response_schema(status) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, status, "Failed to read response body");
            return ApiError::internal().into_response();
        }
    };
    let payload: Value = match serde_json::from_slice(&bytes) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(
                method = %operation.method(),
                url = operation.path_template(),
                status,
                error = %e,
                "Response body is not JSON"
            );
            return ApiError::internal().into_response();
        }
    };

    match operation.validate_response(status, &payload) {
        Ok(()) => Response::from_parts(parts, Body::from(bytes)),
        Err(violation) => ApiError::from(violation).into_response(),
    }
}
