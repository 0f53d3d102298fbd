//! Signature engine.
//!
//! Pure sign/verify over three families (HMAC, RSA, ECDSA). No HTTP knowledge.
//!
//! ## Components
//! - `spec`: algorithm identification and the closed [`Signer`] dispatch variant
//! - `hmac`, `rsa`, `ecdsa`: per-family back-ends
//! - `error`: [`SigningError`]
//!
//! Every entry point resolves the [`SigningAlgorithmSpec`] first, so an
//! unsupported combination fails with `AlgorithmNotSupported` before any key
//! is parsed.

pub mod ecdsa;
pub mod error;
pub mod hmac;
pub mod rsa;
pub mod spec;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

pub use error::SigningError;
pub use spec::{DigestAlgorithm, EcCurve, Signer, SigningAlgorithmSpec, SigningFamily};

/// How signature bytes travel in the `X-FBAPI-SIGNATURE` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureEncoding {
    #[default]
    Hex,
    Base64,
}

/// Raw signature bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn encode(&self, encoding: SignatureEncoding) -> String {
        match encoding {
            SignatureEncoding::Hex => hex::encode(&self.0),
            SignatureEncoding::Base64 => BASE64.encode(&self.0),
        }
    }

    /// Undecodable text is `InvalidSignature`: it cannot be the signature.
    pub fn decode(value: &str, encoding: SignatureEncoding) -> Result<Self, SigningError> {
        let bytes = match encoding {
            SignatureEncoding::Hex => hex::decode(value.trim()).ok(),
            SignatureEncoding::Base64 => BASE64.decode(value.trim()).ok(),
        };
        bytes.map(Self).ok_or(SigningError::InvalidSignature)
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Sign `message` with `key` (HMAC secret or PEM private key).
pub fn sign(message: &[u8], key: &str, spec: &SigningAlgorithmSpec) -> Result<Signature, SigningError> {
    let bytes = match spec.resolve()? {
        Signer::Hmac(digest) => hmac::sign(digest, key.as_bytes(), message)?,
        Signer::Rsa(digest) => rsa::sign(digest, key, message)?,
        Signer::Ecdsa(curve) => ecdsa::sign(curve, key, message)?,
    };
    Ok(Signature(bytes))
}

/// Verify `signature` over `message` with `key` (HMAC secret or PEM public key).
pub fn verify(
    message: &[u8],
    key: &str,
    signature: &[u8],
    spec: &SigningAlgorithmSpec,
) -> Result<(), SigningError> {
    match spec.resolve()? {
        Signer::Hmac(digest) => hmac::verify(digest, key.as_bytes(), message, signature),
        Signer::Rsa(digest) => rsa::verify(digest, key, message, signature),
        Signer::Ecdsa(curve) => ecdsa::verify(curve, key, message, signature),
    }
}

/// Trim every line of a PEM block so indented keys from YAML or test
/// literals parse.
pub(crate) fn normalize_pem(pem: &str) -> String {
    let mut out = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSA_PRIVATE_KEY: &str = include_str!("../../tests/fixtures/rsa_private.pem");

    #[test]
    fn test_normalize_pem_strips_indentation() {
        let indented = "\n    -----BEGIN X-----\n    AAAA\n    -----END X-----\n  ";
        assert_eq!(
            normalize_pem(indented),
            "-----BEGIN X-----\nAAAA\n-----END X-----\n"
        );
    }

    #[test]
    fn test_indented_rsa_key_signs() {
        let indented: String = RSA_PRIVATE_KEY
            .lines()
            .map(|l| format!("        {}\n", l))
            .collect();
        let spec = SigningAlgorithmSpec::new(SigningFamily::Rsa, DigestAlgorithm::Sha256);
        assert_eq!(
            sign(b"data", &indented, &spec).unwrap(),
            sign(b"data", RSA_PRIVATE_KEY, &spec).unwrap()
        );
    }

    #[test]
    fn test_unsupported_before_key_parsing() {
        let spec = SigningAlgorithmSpec::new(SigningFamily::Ecdsa, DigestAlgorithm::Sha512);
        // the key is garbage; the algorithm error must still win
        assert!(sign(b"m", "garbage", &spec).unwrap_err().is_algorithm_not_supported());
        assert!(
            verify(b"m", "garbage", b"sig", &spec)
                .unwrap_err()
                .is_algorithm_not_supported()
        );
    }

    #[test]
    fn test_encoding_round_trip() {
        let signature = Signature::from(vec![0x00, 0xff, 0x10]);
        assert_eq!(signature.encode(SignatureEncoding::Hex), "00ff10");
        assert_eq!(signature.encode(SignatureEncoding::Base64), "AP8Q");
        assert_eq!(
            Signature::decode("AP8Q", SignatureEncoding::Base64).unwrap(),
            signature
        );
        assert_eq!(
            Signature::decode("zz", SignatureEncoding::Hex),
            Err(SigningError::InvalidSignature)
        );
        assert_eq!(
            Signature::decode("not base64!", SignatureEncoding::Base64),
            Err(SigningError::InvalidSignature)
        );
    }
}
