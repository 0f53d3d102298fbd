use axum::{Json, response::IntoResponse};

use super::super::error::{ApiError, ApiResult, ok};
use crate::controllers::models::{Capabilities, CapabilityComponents};

/// GET /capabilities
pub async fn get_capabilities() -> ApiResult<Json<Capabilities>> {
    let all = || vec!["*".to_string()];
    ok(Capabilities {
        version: env!("CARGO_PKG_VERSION").to_string(),
        components: CapabilityComponents {
            accounts: all(),
            balances: all(),
            trading: all(),
            liquidity: all(),
        },
    })
}

/// Fallback for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    ApiError::not_found()
}
