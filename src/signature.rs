//! Request signatures
//!
//! Every upload is signed by the device with a shared secret:
//!
//! ```text
//! signature = hex(HMAC-SHA256(secret, timestamp ++ content_type ++ device_id ++ file_hash))
//! ```
//!
//! Fields are concatenated in that fixed order with no delimiters. `file_hash`
//! is the lowercase hex SHA-256 of the uploaded file.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors raised while building or computing signatures
#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("Signing key is empty")]
    EmptyKey,

    #[error("Signing key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("HMAC key rejected")]
    InvalidKeyLength,
}

/// Process-wide HMAC key shared with upload clients.
///
/// Immutable once loaded. `Debug` never prints the key material.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Decode a hex-encoded secret (the `SECRET_KEY` setting)
    pub fn from_hex(encoded: &str) -> Result<Self, SignatureError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(SignatureError::EmptyKey);
        }
        Ok(Self(hex::decode(encoded)?))
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

/// Lowercase hex SHA-256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the expected signature for an upload.
pub fn calculate_signature(
    timestamp: &str,
    content_type: &str,
    device_id: &str,
    file_hash: &str,
    key: &SigningKey,
) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| SignatureError::InvalidKeyLength)?;
    mac.update(timestamp.as_bytes());
    mac.update(content_type.as_bytes());
    mac.update(device_id.as_bytes());
    mac.update(file_hash.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Compare two signatures without short-circuiting.
///
/// A length mismatch is rejected up front; otherwise every byte pair is
/// visited and the differences are OR-accumulated, so the running time does
/// not depend on where the first mismatch sits.
pub fn verify_signature(expected: &str, received: &str) -> bool {
    let expected = expected.as_bytes();
    let received = received.as_bytes();
    if expected.len() != received.len() {
        return false;
    }

    let mut diff = 0u8;
    for (a, b) in expected.iter().zip(received.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn zero_key() -> SigningKey {
        SigningKey::from_hex(&"00".repeat(32)).unwrap()
    }

    #[test]
    fn test_sha256_of_empty_input() {
        assert_eq!(sha256_hex(b""), EMPTY_SHA256);
    }

    #[test]
    fn test_known_signature() {
        let signature =
            calculate_signature("1000", "application/zip", "dev1", EMPTY_SHA256, &zero_key())
                .unwrap();

        assert_eq!(
            signature,
            "d6ebc8e8ea4aa0cdc2d02b262870336bbd0d14f6c72c39c064a22bf4c1cc6ccd"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let key = SigningKey::from_bytes(b"device-fleet-secret".to_vec());
        let a = calculate_signature("1700000000", "multipart/form-data", "dev-7", EMPTY_SHA256, &key)
            .unwrap();
        let b = calculate_signature("1700000000", "multipart/form-data", "dev-7", EMPTY_SHA256, &key)
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_signature_binds_every_field() {
        let key = zero_key();
        let base = calculate_signature("1000", "application/zip", "dev1", EMPTY_SHA256, &key).unwrap();

        let variants = [
            calculate_signature("1001", "application/zip", "dev1", EMPTY_SHA256, &key),
            calculate_signature("1000", "", "dev1", EMPTY_SHA256, &key),
            calculate_signature("1000", "application/zip", "dev2", EMPTY_SHA256, &key),
            calculate_signature("1000", "application/zip", "dev1", &sha256_hex(b"x"), &key),
            calculate_signature(
                "1000",
                "application/zip",
                "dev1",
                EMPTY_SHA256,
                &SigningKey::from_hex(&"01".repeat(32)).unwrap(),
            ),
        ];

        for variant in variants {
            assert_ne!(variant.unwrap(), base);
        }
    }

    #[test]
    fn test_verify_signature() {
        assert!(verify_signature("abcdef", "abcdef"));
        assert!(!verify_signature("abcdef", "abcdeF"));
        assert!(!verify_signature("abcdef", "bbcdef"));
        assert!(!verify_signature("abcdef", "abcde"));
        assert!(!verify_signature("", "a"));
        assert!(verify_signature("", ""));
    }

    #[test]
    fn test_verify_signature_is_symmetric() {
        let pairs = [("abc", "abc"), ("abc", "abd"), ("abc", "ab"), ("", "x")];
        for (a, b) in pairs {
            assert_eq!(verify_signature(a, b), verify_signature(b, a));
        }
    }

    #[test]
    fn test_signing_key_from_hex() {
        assert!(matches!(SigningKey::from_hex(""), Err(SignatureError::EmptyKey)));
        assert!(matches!(SigningKey::from_hex("zz"), Err(SignatureError::InvalidHex(_))));
        assert!(matches!(SigningKey::from_hex("abc"), Err(SignatureError::InvalidHex(_))));
        assert_eq!(SigningKey::from_hex(" 0a0b \n").unwrap().as_bytes(), &[0x0a, 0x0b]);
    }

    #[test]
    fn test_signing_key_debug_is_redacted() {
        let key = SigningKey::from_hex("deadbeef").unwrap();
        let printed = format!("{:?}", key);

        assert!(!printed.contains("deadbeef"));
        assert!(!printed.contains("222"));
        assert!(printed.contains("len: 4"));
    }
}
