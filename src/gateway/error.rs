//! Wire error mapping.
//!
//! Every failure kind in the crate converts into [`ApiError`], which renders
//! as `{message, errorType, requestPart?, propertyName?}` with its status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::api_auth::AuthError;
use crate::controllers::ControllerError;
use crate::pagination::PaginationError;
use crate::validation::{RequestPart, ResponseSchemaViolation, ValidationViolation};

/// Wire `errorType` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    SchemaError,
    SchemaPropertyError,
    NotFound,
    InternalError,
    Unauthorized,
    PayloadTooLarge,
    UnknownAsset,
    UnsupportedConversion,
    QuoteNotReady,
    IdempotencyKeyReuse,
    OrderNotTrading,
}

/// Error body as sent to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub error_type: ErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_part: Option<RequestPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                error_type,
                request_part: None,
                property_name: None,
            },
        }
    }

    pub fn with_part(mut self, part: RequestPart) -> Self {
        self.body.request_part = Some(part);
        self
    }

    pub fn with_property(mut self, property: Option<String>) -> Self {
        self.body.property_name = property;
        self
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorType::NotFound, "Entity not found")
    }

    /// Generic 500. Details belong in the log, never in the body.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::InternalError,
            "Unexpected server error",
        )
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorType::PayloadTooLarge,
            format!("Request body exceeds {} bytes", limit),
        )
        .with_part(RequestPart::Body)
    }

    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.code.http_status(), ErrorType::Unauthorized, err.message)
            .with_part(RequestPart::Headers)
            .with_property(Some(format!("/{}", err.code.header())))
    }
}

impl From<ValidationViolation> for ApiError {
    fn from(v: ValidationViolation) -> Self {
        let error_type = if v.property_path.is_some() {
            ErrorType::SchemaPropertyError
        } else {
            ErrorType::SchemaError
        };
        Self::new(StatusCode::BAD_REQUEST, error_type, v.message)
            .with_part(v.request_part)
            .with_property(v.property_path)
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ValidationViolation::from(err).into()
    }
}

impl From<ResponseSchemaViolation> for ApiError {
    fn from(v: ResponseSchemaViolation) -> Self {
        tracing::error!(
            method = %v.method,
            url = %v.url,
            status = v.status,
            property = ?v.property_path,
            payload = %v.payload,
            "{}",
            v
        );
        Self::internal()
    }
}

impl From<ControllerError> for ApiError {
    fn from(err: ControllerError) -> Self {
        let message = err.to_string();
        match err {
            ControllerError::NotFound => Self::not_found(),
            ControllerError::UnknownAsset { property, .. } => {
                Self::new(StatusCode::BAD_REQUEST, ErrorType::UnknownAsset, message)
                    .with_part(RequestPart::Body)
                    .with_property(Some(property))
            }
            ControllerError::UnsupportedConversion { .. } => {
                Self::new(StatusCode::BAD_REQUEST, ErrorType::UnsupportedConversion, message)
            }
            ControllerError::QuoteNotReady(_) => {
                Self::new(StatusCode::BAD_REQUEST, ErrorType::QuoteNotReady, message)
            }
            ControllerError::IdempotencyKeyReuse(_) => {
                Self::new(StatusCode::BAD_REQUEST, ErrorType::IdempotencyKeyReuse, message)
                    .with_part(RequestPart::Body)
                    .with_property(Some("/idempotencyKey".to_string()))
            }
            ControllerError::OrderNotTrading(_) => {
                Self::new(StatusCode::BAD_REQUEST, ErrorType::OrderNotTrading, message)
            }
        }
    }
}

/// 200 with a JSON body.
pub fn ok<T: Serialize>(data: T) -> ApiResult<Json<T>> {
    Ok(Json(data))
}
