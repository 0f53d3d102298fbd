use chrono::{SecondsFormat, Utc};
use dashmap::DashMap;
use std::collections::HashMap;

use super::error::ControllerError;
use super::models::{Order, OrderRequest, OrderStatus};
use crate::pagination::{PaginationWindow, paginate};

#[derive(Debug, Default)]
struct AccountOrders {
    /// newest first
    orders: Vec<Order>,
    /// idempotency key -> order id
    by_key: HashMap<String, String>,
}

/// Orders per sub-account, kept in memory.
///
/// The caller checks that the account and book exist; this controller only
/// owns order state.
#[derive(Debug, Default)]
pub struct OrdersController {
    accounts: DashMap<String, AccountOrders>,
}

impl OrdersController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, account_id: &str, window: &PaginationWindow) -> Vec<Order> {
        self.accounts
            .get(account_id)
            .map(|a| paginate(&a.orders, window, |o| o.id.as_str()))
            .unwrap_or_default()
    }

    /// Place an order. Re-submitting the same request under the same
    /// idempotency key returns the original order.
    pub fn create(&self, account_id: &str, request: OrderRequest) -> Result<Order, ControllerError> {
        // entry() holds the shard lock for the whole check-then-insert
        let mut entry = self.accounts.entry(account_id.to_string()).or_default();
        let state = entry.value_mut();

        if let Some(existing_id) = state.by_key.get(&request.idempotency_key) {
            let existing = state
                .orders
                .iter()
                .find(|o| &o.id == existing_id)
                .ok_or(ControllerError::NotFound)?;
            if existing.request == request {
                return Ok(existing.clone());
            }
            return Err(ControllerError::IdempotencyKeyReuse(
                request.idempotency_key,
            ));
        }

        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            status: OrderStatus::Trading,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            request,
        };
        state
            .by_key
            .insert(order.request.idempotency_key.clone(), order.id.clone());
        state.orders.insert(0, order.clone());
        tracing::info!(account_id, order_id = %order.id, "Order placed");
        Ok(order)
    }

    pub fn get(&self, account_id: &str, order_id: &str) -> Result<Order, ControllerError> {
        self.accounts
            .get(account_id)
            .and_then(|a| a.orders.iter().find(|o| o.id == order_id).cloned())
            .ok_or(ControllerError::NotFound)
    }

    /// Cancel a TRADING order.
    pub fn cancel(&self, account_id: &str, order_id: &str) -> Result<(), ControllerError> {
        let mut account = self
            .accounts
            .get_mut(account_id)
            .ok_or(ControllerError::NotFound)?;
        let order = account
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(ControllerError::NotFound)?;
        if order.status != OrderStatus::Trading {
            return Err(ControllerError::OrderNotTrading(order_id.to_string()));
        }
        order.status = OrderStatus::Canceled;
        tracing::info!(account_id, order_id, "Order canceled");
        Ok(())
    }
}
