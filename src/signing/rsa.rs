//! RSA PKCS#1 v1.5 signing over PEM-encoded keys.

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha512};
use sha3::Sha3_256;

use super::error::SigningError;
use super::normalize_pem;
use super::spec::DigestAlgorithm;

pub fn sign(
    digest: DigestAlgorithm,
    private_key_pem: &str,
    message: &[u8],
) -> Result<Vec<u8>, SigningError> {
    let key = parse_private_key(private_key_pem)?;
    let signature = match digest {
        DigestAlgorithm::Sha256 => SigningKey::<Sha256>::new(key).try_sign(message),
        DigestAlgorithm::Sha512 => SigningKey::<Sha512>::new(key).try_sign(message),
        DigestAlgorithm::Sha3_256 => SigningKey::<Sha3_256>::new(key).try_sign(message),
    }
    .map_err(|e| SigningError::InvalidKey(format!("rsa signing failed: {}", e)))?;
    Ok(signature.to_vec())
}

/// Any parse or verification failure is reported as `InvalidSignature`.
pub fn verify(
    digest: DigestAlgorithm,
    public_key_pem: &str,
    message: &[u8],
    signature: &[u8],
) -> Result<(), SigningError> {
    let key = parse_public_key(public_key_pem).map_err(|_| SigningError::InvalidSignature)?;
    let signature = Signature::try_from(signature).map_err(|_| SigningError::InvalidSignature)?;
    let outcome = match digest {
        DigestAlgorithm::Sha256 => VerifyingKey::<Sha256>::new(key).verify(message, &signature),
        DigestAlgorithm::Sha512 => VerifyingKey::<Sha512>::new(key).verify(message, &signature),
        DigestAlgorithm::Sha3_256 => VerifyingKey::<Sha3_256>::new(key).verify(message, &signature),
    };
    outcome.map_err(|_| SigningError::InvalidSignature)
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, SigningError> {
    let pem = normalize_pem(pem);
    let parsed = if pem.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(&pem).map_err(|e| e.to_string())
    } else {
        RsaPrivateKey::from_pkcs8_pem(&pem).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| SigningError::InvalidKey(format!("rsa private key: {}", e)))
}

fn parse_public_key(pem: &str) -> Result<RsaPublicKey, SigningError> {
    let pem = normalize_pem(pem);
    let parsed = if pem.contains("BEGIN RSA PUBLIC KEY") {
        RsaPublicKey::from_pkcs1_pem(&pem).map_err(|e| e.to_string())
    } else {
        RsaPublicKey::from_public_key_pem(&pem).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| SigningError::InvalidKey(format!("rsa public key: {}", e)))
}
