//! Request authentication.
//!
//! ## Components
//! - `canonical`: canonical request string shared by client and server
//! - `nonce_store`: replay protection (injectable [`NonceStore`])
//! - `error`: authentication error codes
//! - `models`: credentials and the authenticated client
//! - `repository`: api-key to credential lookup
//! - `middleware`: [`AuthPipeline`] and the axum middleware
//! - `signer`: client-side [`RequestSigner`]

pub mod canonical;
pub mod error;
pub mod middleware;
pub mod models;
pub mod nonce_store;
pub mod repository;
pub mod signer;

pub const HEADER_API_KEY: &str = "x-fbapi-key";
pub const HEADER_NONCE: &str = "x-fbapi-nonce";
pub const HEADER_TIMESTAMP: &str = "x-fbapi-timestamp";
pub const HEADER_SIGNATURE: &str = "x-fbapi-signature";

// Re-export for convenience
pub use canonical::canonical_string;
pub use error::{AuthError, AuthErrorCode};
pub use middleware::{AuthPipeline, AuthState, auth_middleware, now_ms, validate_timestamp};
pub use models::{ApiCredential, AuthenticatedClient};
pub use nonce_store::{InMemoryNonceStore, NonceStore};
pub use repository::CredentialRepository;
pub use signer::{RequestSigner, SignedHeaders};
