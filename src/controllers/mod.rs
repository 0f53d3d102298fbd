//! In-memory business controllers behind the reference server.
//!
//! Handlers only reach these after authentication and request validation
//! have passed; failures come back as [`ControllerError`] kinds.

pub mod accounts;
pub mod amount;
pub mod books;
pub mod error;
pub mod models;
pub mod orders;
pub mod quotes;

pub use accounts::AccountsController;
pub use amount::Amount;
pub use books::BooksController;
pub use error::ControllerError;
pub use orders::OrdersController;
pub use quotes::QuotesController;

/// All controllers, shared by the handlers.
#[derive(Default)]
pub struct Controllers {
    pub accounts: AccountsController,
    pub books: BooksController,
    pub orders: OrdersController,
    pub quotes: QuotesController,
}

impl Controllers {
    pub fn new() -> Self {
        Self::default()
    }
}
