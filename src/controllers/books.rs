use super::amount::Amount;
use super::error::ControllerError;
use super::models::{AssetReference, MarketEntry, OrderBook};
use crate::pagination::{PaginationWindow, paginate};

struct BookState {
    book: OrderBook,
    /// best (lowest) first
    asks: Vec<MarketEntry>,
    /// best (highest) first
    bids: Vec<MarketEntry>,
}

/// Static order books with a few price levels per side.
pub struct BooksController {
    books: Vec<BookState>,
}

impl Default for BooksController {
    fn default() -> Self {
        let books = [
            ("BTC-USD", AssetReference::crypto("BITCOIN", "BTC"), 60_000),
            ("ETH-USD", AssetReference::crypto("ETHEREUM", "ETH"), 3_000),
            ("USDC-USD", AssetReference::other("usdc-eth"), 1),
        ]
        .into_iter()
        .map(|(id, base, mid)| BookState {
            book: OrderBook {
                id: id.to_string(),
                description: format!("{} against US dollar", base),
                base_asset: base,
                quote_asset: AssetReference::fiat("USD"),
            },
            asks: levels(id, "ask", mid, 1),
            bids: levels(id, "bid", mid, -1),
        })
        .collect();
        Self { books }
    }
}

fn levels(book_id: &str, side: &str, mid: u32, direction: i64) -> Vec<MarketEntry> {
    (1..=5u32)
        .map(|level| {
            // mid +/- level percent, two decimals
            let price_cents = i64::from(mid) * 100 + direction * i64::from(mid) * i64::from(level);
            let price = Amount::new(price_cents.unsigned_abs() as u32, 2);
            let amount = Amount::new(level * 10, 1);
            let total = Amount::from_decimal(price.inner() * amount.inner()).unwrap_or(Amount::ZERO);
            MarketEntry {
                id: format!("{}-{}-{}", book_id, side, level),
                price,
                amount,
                total_price: total,
            }
        })
        .collect()
}

impl BooksController {
    pub fn exists(&self, book_id: &str) -> bool {
        self.find(book_id).is_ok()
    }

    pub fn list(&self, window: &PaginationWindow) -> Vec<OrderBook> {
        let books: Vec<OrderBook> = self.books.iter().map(|b| b.book.clone()).collect();
        paginate(&books, window, |b| b.id.as_str())
    }

    pub fn get(&self, book_id: &str) -> Result<OrderBook, ControllerError> {
        self.find(book_id).map(|b| b.book.clone())
    }

    pub fn asks(
        &self,
        book_id: &str,
        window: &PaginationWindow,
    ) -> Result<Vec<MarketEntry>, ControllerError> {
        let state = self.find(book_id)?;
        Ok(paginate(&state.asks, window, |e| e.id.as_str()))
    }

    pub fn bids(
        &self,
        book_id: &str,
        window: &PaginationWindow,
    ) -> Result<Vec<MarketEntry>, ControllerError> {
        let state = self.find(book_id)?;
        Ok(paginate(&state.bids, window, |e| e.id.as_str()))
    }

    fn find(&self, book_id: &str) -> Result<&BookState, ControllerError> {
        self.books
            .iter()
            .find(|b| b.book.id == book_id)
            .ok_or(ControllerError::NotFound)
    }
}
