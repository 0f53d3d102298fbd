//! Signing algorithm identification.
//!
//! A [`SigningAlgorithmSpec`] is what the configuration names (`family`, `digest`,
//! optional `curve`). It is resolved once into a closed [`Signer`] variant; only
//! the combinations listed below resolve, everything else is
//! [`SigningError::AlgorithmNotSupported`].
//!
//! | Family | Digests                  | Curve                                     |
//! |--------|--------------------------|-------------------------------------------|
//! | hmac   | sha256, sha512, sha3-256 | n/a                                       |
//! | rsa    | sha256, sha512, sha3-256 | n/a                                       |
//! | ecdsa  | sha256                   | secp256k1 (default), prime256v1, secp384r1 |
//!
//! For ECDSA the configured curve is a preference: the key's own curve is what
//! signs or verifies (see [`super::ecdsa`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SigningError;

/// Signature family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningFamily {
    Hmac,
    Rsa,
    Ecdsa,
}

impl SigningFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hmac => "hmac",
            Self::Rsa => "rsa",
            Self::Ecdsa => "ecdsa",
        }
    }
}

impl FromStr for SigningFamily {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hmac" => Ok(Self::Hmac),
            "rsa" => Ok(Self::Rsa),
            "ecdsa" => Ok(Self::Ecdsa),
            other => Err(SigningError::AlgorithmNotSupported(format!(
                "unknown signing family '{}'",
                other
            ))),
        }
    }
}

/// Message digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[serde(rename = "sha256")]
    Sha256,
    #[serde(rename = "sha512")]
    Sha512,
    #[serde(rename = "sha3-256")]
    Sha3_256,
}

impl DigestAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Sha3_256 => "sha3-256",
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "sha3-256" => Ok(Self::Sha3_256),
            other => Err(SigningError::AlgorithmNotSupported(format!(
                "unknown digest '{}'",
                other
            ))),
        }
    }
}

/// Elliptic curves the ECDSA back-end can work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    Secp256k1,
    P256,
    P384,
}

impl EcCurve {
    pub const DEFAULT_NAME: &'static str = "secp256k1";
    pub const ALL: [Self; 3] = [Self::Secp256k1, Self::P256, Self::P384];

    /// Resolve a named curve (OpenSSL, SEC and NIST names accepted).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "secp256k1" => Some(Self::Secp256k1),
            "prime256v1" | "p256" | "p-256" | "secp256r1" => Some(Self::P256),
            "secp384r1" | "p384" | "p-384" => Some(Self::P384),
            _ => None,
        }
    }

    /// OpenSSL name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::P256 => "prime256v1",
            Self::P384 => "secp384r1",
        }
    }

    /// This curve followed by every other supported one.
    pub fn with_fallbacks(self) -> Vec<Self> {
        std::iter::once(self)
            .chain(Self::ALL.into_iter().filter(move |c| *c != self))
            .collect()
    }
}

/// Algorithm selection as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SigningAlgorithmSpec {
    pub family: SigningFamily,
    pub digest: DigestAlgorithm,
    /// Only meaningful for `ecdsa`; defaults to `secp256k1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
}

impl SigningAlgorithmSpec {
    pub fn new(family: SigningFamily, digest: DigestAlgorithm) -> Self {
        Self {
            family,
            digest,
            curve: None,
        }
    }

    pub fn with_curve(mut self, curve: impl Into<String>) -> Self {
        self.curve = Some(curve.into());
        self
    }

    pub fn curve_name(&self) -> &str {
        self.curve.as_deref().unwrap_or(EcCurve::DEFAULT_NAME)
    }

    /// Resolve into the closed dispatch variant.
    ///
    /// This is the only place the support table is consulted; it runs before
    /// any key parsing or cryptographic work.
    pub fn resolve(&self) -> Result<Signer, SigningError> {
        match (self.family, self.digest) {
            (SigningFamily::Hmac, digest) => Ok(Signer::Hmac(digest)),
            (SigningFamily::Rsa, digest) => Ok(Signer::Rsa(digest)),
            (SigningFamily::Ecdsa, DigestAlgorithm::Sha256) => EcCurve::from_name(self.curve_name())
                .map(Signer::Ecdsa)
                .ok_or_else(|| {
                    SigningError::AlgorithmNotSupported(format!(
                        "ecdsa curve '{}' is not supported",
                        self.curve_name()
                    ))
                }),
            (SigningFamily::Ecdsa, digest) => Err(SigningError::AlgorithmNotSupported(format!(
                "ecdsa does not support digest '{}'",
                digest.as_str()
            ))),
        }
    }
}

impl fmt::Display for SigningAlgorithmSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family {
            SigningFamily::Ecdsa => write!(
                f,
                "{}/{}/{}",
                self.family.as_str(),
                self.digest.as_str(),
                self.curve_name()
            ),
            _ => write!(f, "{}/{}", self.family.as_str(), self.digest.as_str()),
        }
    }
}

/// Resolved signer: one variant per supported family, carrying exactly the
/// parameters that family needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signer {
    Hmac(DigestAlgorithm),
    Rsa(DigestAlgorithm),
    Ecdsa(EcCurve),
}
