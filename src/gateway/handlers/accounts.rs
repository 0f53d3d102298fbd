//! Account and balance handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use super::super::error::{ApiResult, ok};
use super::super::extract::{ValidatedQuery, Window};
use super::super::state::AppState;
use crate::controllers::models::{Account, Balance};

#[derive(Debug, Default, Deserialize)]
pub struct BalancesFlag {
    #[serde(default)]
    pub balances: bool,
}

#[derive(Debug, Serialize)]
pub struct AccountsPage {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Serialize)]
pub struct BalancesPage {
    pub balances: Vec<Balance>,
}

/// GET /accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    ValidatedQuery(flag): ValidatedQuery<BalancesFlag>,
    Window(window): Window,
) -> ApiResult<Json<AccountsPage>> {
    let accounts = state.controllers.accounts.list(&window, flag.balances);
    ok(AccountsPage { accounts })
}

/// GET /accounts/{accountId}
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    ValidatedQuery(flag): ValidatedQuery<BalancesFlag>,
) -> ApiResult<Json<Account>> {
    ok(state.controllers.accounts.get(&account_id, flag.balances)?)
}

/// GET /accounts/{accountId}/balances
pub async fn get_balances(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Window(window): Window,
) -> ApiResult<Json<BalancesPage>> {
    let balances = state.controllers.accounts.balances(&account_id, &window)?;
    ok(BalancesPage { balances })
}
