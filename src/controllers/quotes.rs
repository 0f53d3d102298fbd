use chrono::{Duration, SecondsFormat, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use super::amount::Amount;
use super::error::ControllerError;
use super::models::{AssetReference, Quote, QuoteCapability, QuoteRequest, QuoteStatus};
use crate::pagination::{PaginationWindow, paginate};

const QUOTE_TTL_SECS: i64 = 60;
const RATE_DP: u32 = 8;

/// Liquidity desk: fixed USD reference prices and a list of quotable pairs.
#[derive(Debug)]
pub struct QuotesController {
    /// asset -> price in USD
    prices: Vec<(AssetReference, Decimal)>,
    capabilities: Vec<QuoteCapability>,
    /// account id -> quotes, newest first
    quotes: DashMap<String, Vec<Quote>>,
}

impl Default for QuotesController {
    fn default() -> Self {
        let usd = AssetReference::fiat("USD");
        let prices = vec![
            (usd.clone(), Decimal::ONE),
            (AssetReference::fiat("EUR"), Decimal::new(108, 2)),
            (AssetReference::crypto("BITCOIN", "BTC"), Decimal::new(60_000, 0)),
            (AssetReference::crypto("ETHEREUM", "ETH"), Decimal::new(3_000, 0)),
            (AssetReference::other("usdc-eth"), Decimal::ONE),
        ];
        // every asset converts to and from USD, except USD -> EUR
        let eur = AssetReference::fiat("EUR");
        let capabilities: Vec<(AssetReference, AssetReference)> = prices
            .iter()
            .skip(1)
            .flat_map(|(asset, _)| [(usd.clone(), asset.clone()), (asset.clone(), usd.clone())])
            .filter(|(from, to)| !(*from == usd && *to == eur))
            .collect();
        let capabilities = capabilities
            .into_iter()
            .enumerate()
            .map(|(i, (from_asset, to_asset))| QuoteCapability {
                id: (i + 1).to_string(),
                from_asset,
                to_asset,
            })
            .collect();
        Self::new(prices, capabilities)
    }
}

impl QuotesController {
    pub fn new(prices: Vec<(AssetReference, Decimal)>, capabilities: Vec<QuoteCapability>) -> Self {
        Self {
            prices,
            capabilities,
            quotes: DashMap::new(),
        }
    }

    pub fn capabilities(&self, window: &PaginationWindow) -> Vec<QuoteCapability> {
        paginate(&self.capabilities, window, |c| c.id.as_str())
    }

    pub fn list(&self, account_id: &str, window: &PaginationWindow) -> Vec<Quote> {
        self.quotes
            .get(account_id)
            .map(|quotes| paginate(quotes.as_slice(), window, |q| q.id.as_str()))
            .unwrap_or_default()
    }

    pub fn create(&self, account_id: &str, request: QuoteRequest) -> Result<Quote, ControllerError> {
        let from_price = self.price(&request.from_asset, "/fromAsset")?;
        let to_price = self.price(&request.to_asset, "/toAsset")?;
        if !self.supports(&request.from_asset, &request.to_asset) {
            return Err(ControllerError::UnsupportedConversion {
                from: request.from_asset.to_string(),
                to: request.to_asset.to_string(),
            });
        }

        let rate = from_price / to_price;
        let (from_amount, to_amount) = match (request.from_amount, request.to_amount) {
            (Some(from), _) => (from.inner(), from.inner() * from_price / to_price),
            (None, Some(to)) => (to.inner() * to_price / from_price, to.inner()),
            // the contract requires one of the two
            (None, None) => (Decimal::ZERO, Decimal::ZERO),
        };

        let now = Utc::now();
        let quote = Quote {
            id: uuid::Uuid::new_v4().to_string(),
            status: QuoteStatus::Ready,
            from_asset: request.from_asset,
            to_asset: request.to_asset,
            from_amount: amount(from_amount),
            to_amount: amount(to_amount),
            conversion_rate: amount(rate),
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            expires_at: (now + Duration::seconds(QUOTE_TTL_SECS))
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.quotes
            .entry(account_id.to_string())
            .or_default()
            .insert(0, quote.clone());
        tracing::info!(account_id, quote_id = %quote.id, "Quote created");
        Ok(quote)
    }

    pub fn get(&self, account_id: &str, quote_id: &str) -> Result<Quote, ControllerError> {
        self.quotes
            .get(account_id)
            .and_then(|q| q.iter().find(|q| q.id == quote_id).cloned())
            .ok_or(ControllerError::NotFound)
    }

    /// Execute a READY quote.
    pub fn execute(&self, account_id: &str, quote_id: &str) -> Result<Quote, ControllerError> {
        let mut quotes = self
            .quotes
            .get_mut(account_id)
            .ok_or(ControllerError::NotFound)?;
        let quote = quotes
            .iter_mut()
            .find(|q| q.id == quote_id)
            .ok_or(ControllerError::NotFound)?;
        if quote.status != QuoteStatus::Ready {
            return Err(ControllerError::QuoteNotReady(quote_id.to_string()));
        }
        quote.status = QuoteStatus::Executed;
        tracing::info!(account_id, quote_id, "Quote executed");
        Ok(quote.clone())
    }

    fn price(&self, asset: &AssetReference, property: &str) -> Result<Decimal, ControllerError> {
        self.prices
            .iter()
            .find(|(a, _)| a == asset)
            .map(|(_, p)| *p)
            .ok_or_else(|| ControllerError::UnknownAsset {
                property: property.to_string(),
                asset: asset.to_string(),
            })
    }

    fn supports(&self, from: &AssetReference, to: &AssetReference) -> bool {
        self.capabilities
            .iter()
            .any(|c| c.from_asset == *from && c.to_asset == *to)
    }
}

fn amount(d: Decimal) -> Amount {
    Amount::from_decimal(d.round_dp(RATE_DP)).unwrap_or(Amount::ZERO)
}
