//! Domain objects returned by the controllers.
//!
//! Field names follow the contract's camelCase wire names.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::Amount;

/// Reference to an asset, one of three shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetReference {
    NationalCurrency {
        #[serde(rename = "nationalCurrencyCode")]
        national_currency_code: String,
    },
    Blockchain {
        blockchain: String,
        #[serde(rename = "cryptocurrencySymbol")]
        cryptocurrency_symbol: String,
    },
    Other {
        #[serde(rename = "assetId")]
        asset_id: String,
    },
}

impl AssetReference {
    pub fn fiat(code: &str) -> Self {
        Self::NationalCurrency {
            national_currency_code: code.to_string(),
        }
    }

    pub fn crypto(blockchain: &str, symbol: &str) -> Self {
        Self::Blockchain {
            blockchain: blockchain.to_string(),
            cryptocurrency_symbol: symbol.to_string(),
        }
    }

    pub fn other(asset_id: &str) -> Self {
        Self::Other {
            asset_id: asset_id.to_string(),
        }
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NationalCurrency {
                national_currency_code,
            } => f.write_str(national_currency_code),
            Self::Blockchain {
                blockchain,
                cryptocurrency_symbol,
            } => write!(f, "{}@{}", cryptocurrency_symbol, blockchain),
            Self::Other { asset_id } => f.write_str(asset_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub id: String,
    pub asset: AssetReference,
    pub available_amount: Amount,
    pub locked_amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: AccountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balances: Option<Vec<Balance>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    pub id: String,
    pub base_asset: AssetReference,
    pub quote_asset: AssetReference,
    pub description: String,
}

/// One price level of a book side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEntry {
    pub id: String,
    pub price: Amount,
    pub amount: Amount,
    pub total_price: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    GoodTillCanceled,
    ImmediateOrCancel,
    FillOrKill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Trading,
    Filled,
    Canceled,
}

/// Exactly one quantity is set; the contract's union enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub idempotency_key: String,
    pub book_id: String,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_asset_quantity: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_asset_quantity: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub created_at: String,
    #[serde(flatten)]
    pub request: OrderRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Ready,
    Executed,
    Expired,
}

/// A conversion pair the liquidity desk will quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCapability {
    pub id: String,
    pub from_asset: AssetReference,
    pub to_asset: AssetReference,
}

/// Exactly one of the amounts is set; the contract's union enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub from_asset: AssetReference,
    pub to_asset: AssetReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_amount: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub status: QuoteStatus,
    pub from_asset: AssetReference,
    pub to_asset: AssetReference,
    pub from_amount: Amount,
    pub to_amount: Amount,
    pub conversion_rate: Amount,
    pub created_at: String,
    pub expires_at: String,
}

/// Server capability summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub version: String,
    pub components: CapabilityComponents,
}

/// Accounts each component is enabled for; `"*"` means all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityComponents {
    pub accounts: Vec<String>,
    pub balances: Vec<String>,
    pub trading: Vec<String>,
    pub liquidity: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_asset_reference_shapes() {
        let cases = [
            (AssetReference::fiat("USD"), json!({ "nationalCurrencyCode": "USD" })),
            (
                AssetReference::crypto("BITCOIN", "BTC"),
                json!({ "blockchain": "BITCOIN", "cryptocurrencySymbol": "BTC" }),
            ),
            (AssetReference::other("usdc-eth"), json!({ "assetId": "usdc-eth" })),
        ];
        for (asset, wire) in cases {
            assert_eq!(serde_json::to_value(&asset).unwrap(), wire);
            assert_eq!(serde_json::from_value::<AssetReference>(wire).unwrap(), asset);
        }
    }

    #[test]
    fn test_order_flattens_request() {
        let order = Order {
            id: "o1".into(),
            status: OrderStatus::Trading,
            created_at: "2024-01-01T00:00:00Z".into(),
            request: OrderRequest {
                idempotency_key: "k".into(),
                book_id: "BTC-USD".into(),
                side: Side::Buy,
                order_type: OrderType::Limit,
                time_in_force: TimeInForce::GoodTillCanceled,
                base_asset_quantity: Some(Amount::new(5, 1)),
                quote_asset_quantity: None,
                price: None,
            },
        };
        let wire = serde_json::to_value(&order).unwrap();
        assert_eq!(wire["bookId"], "BTC-USD");
        assert_eq!(wire["baseAssetQuantity"], "0.5");
        assert_eq!(wire["timeInForce"], "GOOD_TILL_CANCELED");
        assert!(wire.get("quoteAssetQuantity").is_none());
    }
}
