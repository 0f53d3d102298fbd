//! xcom_api_validator - reference server for a signed, schema-validated exchange API
//!
//! Every request passes authentication, the pagination guard and request
//! validation before reaching a handler; every response is checked against
//! the contract before it is sent.
//!
//! # Modules
//!
//! - [`signing`] - HMAC / RSA / ECDSA sign and verify
//! - [`api_auth`] - canonical request string, nonce registry, auth pipeline
//! - [`contract`] - OpenAPI contract loading
//! - [`validation`] - compiled per-operation schemas
//! - [`pagination`] - cursor pagination guard and slicing
//! - [`gateway`] - axum router, middleware and wire errors
//! - [`controllers`] - in-memory accounts, books, orders and quotes

pub mod api_auth;
pub mod config;
pub mod contract;
pub mod controllers;
pub mod gateway;
pub mod logging;
pub mod pagination;
pub mod signing;
pub mod validation;

pub use api_auth::{AuthPipeline, NonceStore, RequestSigner};
pub use config::AppConfig;
pub use contract::ContractDocument;
pub use gateway::{Gateway, build_router, run_server};
pub use signing::{Signature, SigningAlgorithmSpec, SigningError};
pub use validation::SchemaRegistry;
