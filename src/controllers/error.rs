use thiserror::Error;

/// Business failures raised by the in-memory controllers.
///
/// The gateway maps each variant to its wire `errorType` without looking
/// further into the cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("Entity not found")]
    NotFound,

    #[error("Unknown asset: {asset}")]
    UnknownAsset {
        /// Body pointer of the offending asset reference, e.g. `/fromAsset`
        property: String,
        asset: String,
    },

    #[error("Conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: String, to: String },

    #[error("Quote {0} is not ready for execution")]
    QuoteNotReady(String),

    #[error("Idempotency key {0} was already used with a different request")]
    IdempotencyKeyReuse(String),

    #[error("Order {0} is not trading")]
    OrderNotTrading(String),
}
