//! Route handlers.
//!
//! Handlers only see requests that already passed authentication and the
//! contract checks; they translate validated input into controller calls.

mod accounts;
mod liquidity;
mod system;
mod trading;

pub use accounts::{get_account, get_balances, list_accounts};
pub use liquidity::{create_quote, execute_quote, get_quote, get_quote_capabilities, list_quotes};
pub use system::{get_capabilities, not_found};
pub use trading::{
    cancel_order, create_order, get_asks, get_bids, get_book, get_order, list_books, list_orders,
};

use super::error::ApiResult;
use super::state::AppState;
use crate::controllers::ControllerError;

/// Sub-account lookups shared by the per-account routes.
fn require_account(state: &AppState, account_id: &str) -> ApiResult<()> {
    if state.controllers.accounts.exists(account_id) {
        Ok(())
    } else {
        Err(ControllerError::NotFound.into())
    }
}
