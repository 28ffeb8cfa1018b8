//! secp256k1 signer keys and address derivation.

use alloy_primitives::Address;
use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;

use crate::error::CryptoError;
use crate::hash::keccak256;

/// A voucher-signing key held by the trusted backend.
///
/// This type intentionally does not implement `Debug` or `Serialize` to
/// prevent accidental exposure. The inner key zeroizes itself on drop.
pub struct SignerKey {
    signing: SigningKey,
}

impl SignerKey {
    /// Generate a new key from a secure random source.
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::random(&mut OsRng),
        }
    }

    /// Load a key from its 32-byte secret scalar.
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing =
            SigningKey::from_slice(secret).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { signing })
    }

    /// Load a key from hex, with or without a `0x` prefix.
    pub fn from_hex(raw: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(raw.trim_start_matches("0x"))?;
        let secret: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidKey(format!("key must be 32 bytes, got {}", bytes.len())))?;
        Self::from_bytes(&secret)
    }

    /// The address this key signs as.
    pub fn address(&self) -> Address {
        address_of(self.signing.verifying_key())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing
    }
}

/// Derive an address from a public key: the last 20 bytes of
/// `keccak256(uncompressed_point[1..])`.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.as_affine().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}
