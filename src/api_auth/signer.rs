//! Client-side request signing.
//!
//! Produces the four authentication headers for a request using the same
//! canonical string the server verifies against.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use axum::http::Method;
use uuid::Uuid;

use super::canonical::canonical_string;
use super::{HEADER_API_KEY, HEADER_NONCE, HEADER_SIGNATURE, HEADER_TIMESTAMP};
use crate::signing::{self, SignatureEncoding, SigningAlgorithmSpec, SigningError};

/// Header values for one signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub api_key: String,
    pub timestamp: String,
    pub nonce: String,
    pub signature: String,
}

impl SignedHeaders {
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            (HEADER_API_KEY, self.api_key.as_str()),
            (HEADER_TIMESTAMP, self.timestamp.as_str()),
            (HEADER_NONCE, self.nonce.as_str()),
            (HEADER_SIGNATURE, self.signature.as_str()),
        ]
    }

    pub fn to_header_map(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut map = HeaderMap::with_capacity(4);
        for (name, value) in self.pairs() {
            map.insert(HeaderName::from_static(name), HeaderValue::from_str(value)?);
        }
        Ok(map)
    }
}

/// Signs requests on behalf of one api-key.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    api_key: String,
    /// HMAC secret or PEM private key
    key: String,
    algorithm: SigningAlgorithmSpec,
    encoding: SignatureEncoding,
}

impl RequestSigner {
    pub fn new(
        api_key: impl Into<String>,
        key: impl Into<String>,
        algorithm: SigningAlgorithmSpec,
        encoding: SignatureEncoding,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            key: key.into(),
            algorithm,
            encoding,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign with a fresh random nonce.
    pub fn sign(
        &self,
        method: &Method,
        path_and_query: &str,
        body: &[u8],
        timestamp_ms: i64,
    ) -> Result<SignedHeaders, SigningError> {
        let nonce = Uuid::new_v4().to_string();
        self.sign_with_nonce(method, path_and_query, body, timestamp_ms, &nonce)
    }

    pub fn sign_with_nonce(
        &self,
        method: &Method,
        path_and_query: &str,
        body: &[u8],
        timestamp_ms: i64,
        nonce: &str,
    ) -> Result<SignedHeaders, SigningError> {
        let timestamp = timestamp_ms.to_string();
        let message = canonical_string(&timestamp, nonce, method.as_str(), path_and_query, body);
        let signature = signing::sign(&message, &self.key, &self.algorithm)?;
        Ok(SignedHeaders {
            api_key: self.api_key.clone(),
            timestamp,
            nonce: nonce.to_string(),
            signature: signature.encode(self.encoding),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::{DigestAlgorithm, SigningFamily};

    fn signer() -> RequestSigner {
        RequestSigner::new(
            "alice",
            "secret",
            SigningAlgorithmSpec::new(SigningFamily::Hmac, DigestAlgorithm::Sha256),
            SignatureEncoding::Base64,
        )
    }

    #[test]
    fn test_fresh_nonce_per_request() {
        let s = signer();
        let a = s.sign(&Method::GET, "/capabilities", b"", 1).unwrap();
        let b = s.sign(&Method::GET, "/capabilities", b"", 1).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.signature, b.signature);
    }

    #[test]
    fn test_signature_covers_canonical_string() {
        let headers = signer()
            .sign_with_nonce(&Method::GET, "/x?a=1", b"", 42, "n")
            .unwrap();
        let expected = signing::sign(
            b"42nGET/x?a=1",
            "secret",
            &SigningAlgorithmSpec::new(SigningFamily::Hmac, DigestAlgorithm::Sha256),
        )
        .unwrap();
        assert_eq!(headers.signature, expected.encode(SignatureEncoding::Base64));
        assert_eq!(headers.timestamp, "42");
    }

    #[test]
    fn test_header_map() {
        let map = signer()
            .sign(&Method::GET, "/", b"", 1)
            .unwrap()
            .to_header_map()
            .unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get("X-FBAPI-KEY").unwrap(), "alice");
    }
}
