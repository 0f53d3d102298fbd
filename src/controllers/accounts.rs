use super::amount::Amount;
use super::error::ControllerError;
use super::models::{Account, AccountStatus, AssetReference, Balance};
use crate::pagination::{PaginationWindow, paginate};

/// Fixed set of sub-accounts with their balances.
#[derive(Debug, Clone)]
pub struct AccountsController {
    accounts: Vec<Account>,
}

impl Default for AccountsController {
    fn default() -> Self {
        Self::new(seed_accounts())
    }
}

impl AccountsController {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn exists(&self, account_id: &str) -> bool {
        self.find(account_id).is_ok()
    }

    pub fn list(&self, window: &PaginationWindow, with_balances: bool) -> Vec<Account> {
        paginate(&self.accounts, window, |a| a.id.as_str())
            .into_iter()
            .map(|a| shaped(a, with_balances))
            .collect()
    }

    pub fn get(&self, account_id: &str, with_balances: bool) -> Result<Account, ControllerError> {
        self.find(account_id).map(|a| shaped(a.clone(), with_balances))
    }

    pub fn balances(
        &self,
        account_id: &str,
        window: &PaginationWindow,
    ) -> Result<Vec<Balance>, ControllerError> {
        let account = self.find(account_id)?;
        let balances = account.balances.as_deref().unwrap_or_default();
        Ok(paginate(balances, window, |b| b.id.as_str()))
    }

    fn find(&self, account_id: &str) -> Result<&Account, ControllerError> {
        self.accounts
            .iter()
            .find(|a| a.id == account_id)
            .ok_or(ControllerError::NotFound)
    }
}

fn shaped(mut account: Account, with_balances: bool) -> Account {
    if !with_balances {
        account.balances = None;
    }
    account
}

fn seed_accounts() -> Vec<Account> {
    let assets = [
        AssetReference::fiat("USD"),
        AssetReference::crypto("BITCOIN", "BTC"),
        AssetReference::crypto("ETHEREUM", "ETH"),
        AssetReference::other("usdc-eth"),
    ];

    (1..=5u32)
        .map(|n| {
            let balances = assets
                .iter()
                .enumerate()
                .map(|(i, asset)| Balance {
                    id: format!("{}-{}", n, i + 1),
                    asset: asset.clone(),
                    available_amount: Amount::new(n * 1000 + i as u32 * 25, 2),
                    locked_amount: Amount::ZERO,
                })
                .collect();
            Account {
                id: n.to_string(),
                title: format!("Sub-account {}", n),
                description: format!("Trading sub-account number {}", n),
                status: if n == 5 {
                    AccountStatus::Inactive
                } else {
                    AccountStatus::Active
                },
                parent_id: (n > 1).then(|| "1".to_string()),
                balances: Some(balances),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(limit: usize) -> PaginationWindow {
        PaginationWindow {
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn test_list_omits_balances_by_default() {
        let controller = AccountsController::default();
        let accounts = controller.list(&window(10), false);
        assert_eq!(accounts.len(), 5);
        assert!(accounts.iter().all(|a| a.balances.is_none()));
        assert!(controller.list(&window(2), true)[0].balances.is_some());
    }

    #[test]
    fn test_get_and_not_found() {
        let controller = AccountsController::default();
        assert_eq!(controller.get("3", false).unwrap().id, "3");
        assert_eq!(controller.get("99", true), Err(ControllerError::NotFound));
    }

    #[test]
    fn test_balances_paginated() {
        let controller = AccountsController::default();
        let page = controller.balances("2", &window(2)).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, "2-1");
        assert_eq!(
            controller.balances("x", &window(2)),
            Err(ControllerError::NotFound)
        );
    }
}
