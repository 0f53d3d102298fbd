//! Credential and authenticated-client models.

use serde::{Deserialize, Serialize};

use crate::signing::{SignatureEncoding, SigningAlgorithmSpec};

/// Verification material configured for an api-key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredential {
    pub algorithm: SigningAlgorithmSpec,
    /// HMAC secret, or PEM public key for rsa/ecdsa.
    pub key: String,
    #[serde(default)]
    pub encoding: SignatureEncoding,
}

/// Inserted into request extensions once the pipeline passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedClient {
    pub api_key: String,
}
