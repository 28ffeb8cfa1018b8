//! Recoverable secp256k1 signatures over raw 32-byte digests.
//!
//! Encoding is `r ‖ s ‖ v` (65 bytes). `v` is written as 27/28 and accepted as
//! either 27/28 or 0/1. No message prefix is applied: the digest is signed as-is.

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::CryptoError;
use crate::keys::{address_of, SignerKey};

/// A 65-byte recoverable signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature(pub [u8; 65]);

impl RecoverableSignature {
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 65] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Parse `0x`-prefixed (or bare) hex.
    pub fn from_hex(raw: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(raw.trim_start_matches("0x"))?;
        Self::from_slice(&bytes)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    fn recovery_id(&self) -> Result<RecoveryId, CryptoError> {
        let v = self.0[64];
        let normalized = match v {
            27 | 28 => v - 27,
            0 | 1 => v,
            other => return Err(CryptoError::InvalidRecoveryId(other)),
        };
        RecoveryId::from_byte(normalized).ok_or(CryptoError::InvalidRecoveryId(v))
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({}..)", hex::encode(&self.0[..4]))
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Sign a digest, returning the recoverable signature.
pub fn sign_digest(digest: &B256, key: &SignerKey) -> Result<RecoverableSignature, CryptoError> {
    let (signature, recovery_id) = key
        .signing_key()
        .sign_prehash_recoverable(digest.as_slice())
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = 27 + recovery_id.to_byte();
    Ok(RecoverableSignature(out))
}

/// Recover the address that produced `signature` over `digest`.
///
/// A well-formed signature over a different digest recovers *some* address;
/// callers decide whether that address is authorized. High-s signatures are
/// accepted like `ecrecover` does: `s` is folded into the lower half and the
/// parity of `v` flipped to match.
pub fn recover_signer(digest: &B256, signature: &RecoverableSignature) -> Result<Address, CryptoError> {
    let mut recovery_id = signature.recovery_id()?;
    let mut sig = Signature::from_slice(&signature.0[..64])
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    if let Some(low) = sig.normalize_s() {
        sig = low;
        recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
    }
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    Ok(address_of(&key))
}
