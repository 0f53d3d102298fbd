//! Liquidity (quote) handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use super::super::error::{ApiResult, ok};
use super::super::extract::{ValidatedBody, Window};
use super::super::state::AppState;
use super::require_account;
use crate::controllers::models::{Quote, QuoteCapability, QuoteRequest};

#[derive(Debug, Serialize)]
pub struct CapabilitiesPage {
    pub capabilities: Vec<QuoteCapability>,
}

#[derive(Debug, Serialize)]
pub struct QuotesPage {
    pub quotes: Vec<Quote>,
}

/// GET /accounts/{accountId}/liquidity/capabilities
pub async fn get_quote_capabilities(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Window(window): Window,
) -> ApiResult<Json<CapabilitiesPage>> {
    require_account(&state, &account_id)?;
    ok(CapabilitiesPage {
        capabilities: state.controllers.quotes.capabilities(&window),
    })
}

/// GET /accounts/{accountId}/liquidity/quotes
pub async fn list_quotes(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Window(window): Window,
) -> ApiResult<Json<QuotesPage>> {
    require_account(&state, &account_id)?;
    ok(QuotesPage {
        quotes: state.controllers.quotes.list(&account_id, &window),
    })
}

/// POST /accounts/{accountId}/liquidity/quotes
pub async fn create_quote(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    ValidatedBody(request): ValidatedBody<QuoteRequest>,
) -> ApiResult<Json<Quote>> {
    require_account(&state, &account_id)?;
    ok(state.controllers.quotes.create(&account_id, request)?)
}

/// GET /accounts/{accountId}/liquidity/quotes/{id}
pub async fn get_quote(
    State(state): State<AppState>,
    Path((account_id, quote_id)): Path<(String, String)>,
) -> ApiResult<Json<Quote>> {
    require_account(&state, &account_id)?;
    ok(state.controllers.quotes.get(&account_id, &quote_id)?)
}

/// POST /accounts/{accountId}/liquidity/quotes/{id}/execute
pub async fn execute_quote(
    State(state): State<AppState>,
    Path((account_id, quote_id)): Path<(String, String)>,
) -> ApiResult<Json<Quote>> {
    require_account(&state, &account_id)?;
    ok(state.controllers.quotes.execute(&account_id, &quote_id)?)
}
