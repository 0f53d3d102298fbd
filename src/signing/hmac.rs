//! HMAC signing over a shared secret.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use sha3::Sha3_256;

use super::error::SigningError;
use super::spec::DigestAlgorithm;

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;
type HmacSha3_256 = Hmac<Sha3_256>;

pub fn sign(digest: DigestAlgorithm, secret: &[u8], message: &[u8]) -> Result<Vec<u8>, SigningError> {
    match digest {
        DigestAlgorithm::Sha256 => tag::<HmacSha256>(secret, message),
        DigestAlgorithm::Sha512 => tag::<HmacSha512>(secret, message),
        DigestAlgorithm::Sha3_256 => tag::<HmacSha3_256>(secret, message),
    }
}

fn tag<M: Mac + hmac::digest::KeyInit>(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, SigningError> {
    Ok(mac::<M>(secret, message)?.finalize().into_bytes().to_vec())
}

/// Constant-time comparison of the expected tag against `signature`.
pub fn verify(
    digest: DigestAlgorithm,
    secret: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<(), SigningError> {
    let outcome = match digest {
        DigestAlgorithm::Sha256 => mac::<HmacSha256>(secret, message)?.verify_slice(signature),
        DigestAlgorithm::Sha512 => mac::<HmacSha512>(secret, message)?.verify_slice(signature),
        DigestAlgorithm::Sha3_256 => mac::<HmacSha3_256>(secret, message)?.verify_slice(signature),
    };
    outcome.map_err(|_| SigningError::InvalidSignature)
}

fn mac<M: Mac + hmac::digest::KeyInit>(secret: &[u8], message: &[u8]) -> Result<M, SigningError> {
    // HMAC accepts keys of any length, this only fails for exotic MAC types
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|e| SigningError::InvalidKey(format!("hmac secret: {}", e)))?;
    mac.update(message);
    Ok(mac)
}
