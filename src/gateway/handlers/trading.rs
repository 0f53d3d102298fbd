//! Order book and order handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use super::super::error::{ApiResult, ok};
use super::super::extract::{ValidatedBody, Window};
use super::super::state::AppState;
use super::require_account;
use crate::controllers::ControllerError;
use crate::controllers::models::{MarketEntry, Order, OrderBook, OrderRequest};

#[derive(Debug, Serialize)]
pub struct BooksPage {
    pub books: Vec<OrderBook>,
}

#[derive(Debug, Serialize)]
pub struct AsksPage {
    pub asks: Vec<MarketEntry>,
}

#[derive(Debug, Serialize)]
pub struct BidsPage {
    pub bids: Vec<MarketEntry>,
}

#[derive(Debug, Serialize)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
}

/// GET /trading/books
pub async fn list_books(
    State(state): State<AppState>,
    Window(window): Window,
) -> ApiResult<Json<BooksPage>> {
    ok(BooksPage {
        books: state.controllers.books.list(&window),
    })
}

/// GET /trading/books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> ApiResult<Json<OrderBook>> {
    ok(state.controllers.books.get(&book_id)?)
}

/// GET /trading/books/{id}/asks
pub async fn get_asks(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Window(window): Window,
) -> ApiResult<Json<AsksPage>> {
    ok(AsksPage {
        asks: state.controllers.books.asks(&book_id, &window)?,
    })
}

/// GET /trading/books/{id}/bids
pub async fn get_bids(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Window(window): Window,
) -> ApiResult<Json<BidsPage>> {
    ok(BidsPage {
        bids: state.controllers.books.bids(&book_id, &window)?,
    })
}

/// GET /accounts/{accountId}/trading/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Window(window): Window,
) -> ApiResult<Json<OrdersPage>> {
    require_account(&state, &account_id)?;
    ok(OrdersPage {
        orders: state.controllers.orders.list(&account_id, &window),
    })
}

/// POST /accounts/{accountId}/trading/orders
pub async fn create_order(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    ValidatedBody(request): ValidatedBody<OrderRequest>,
) -> ApiResult<Json<Order>> {
    require_account(&state, &account_id)?;
    if !state.controllers.books.exists(&request.book_id) {
        return Err(ControllerError::NotFound.into());
    }
    ok(state.controllers.orders.create(&account_id, request)?)
}

/// GET /accounts/{accountId}/trading/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path((account_id, order_id)): Path<(String, String)>,
) -> ApiResult<Json<Order>> {
    require_account(&state, &account_id)?;
    ok(state.controllers.orders.get(&account_id, &order_id)?)
}

/// DELETE /accounts/{accountId}/trading/orders/{id}
pub async fn cancel_order(
    State(state): State<AppState>,
    Path((account_id, order_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    require_account(&state, &account_id)?;
    state.controllers.orders.cancel(&account_id, &order_id)?;
    Ok(StatusCode::NO_CONTENT)
}
