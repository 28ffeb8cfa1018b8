//! Keccak-256 hashing and the two packed digests the ledger relies on.
//!
//! Both digests use tight packing (no length prefixes, no padding between
//! fields) so that a backend producing vouchers with any Ethereum toolchain
//! arrives at the same bytes.

use alloy_primitives::{Address, Keccak256, B256, U256};
use shuffle_types::truncate_u96;

/// Compute the Keccak-256 hash of arbitrary data.
pub fn keccak256(data: &[u8]) -> B256 {
    alloy_primitives::keccak256(data)
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn keccak256_multi(parts: &[&[u8]]) -> B256 {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}

/// Digest seeding a winner draw: `keccak256(from ‖ uint256 nonce ‖ uint256 magnitude)`.
pub fn winner_digest(from: &Address, nonce: u64, magnitude: u32) -> B256 {
    let nonce_bytes = U256::from(nonce).to_be_bytes::<32>();
    let magnitude_bytes = U256::from(magnitude).to_be_bytes::<32>();
    keccak256_multi(&[from.as_slice(), &nonce_bytes, &magnitude_bytes])
}

/// Digest a voucher signer commits to: `keccak256(recipient ‖ uint96 amount)`.
///
/// The amount is narrowed to its low 96 bits before hashing. Callers must
/// reject amounts that do not fit, otherwise two different amounts share a
/// digest.
pub fn voucher_digest(recipient: &Address, amount: U256) -> B256 {
    keccak256_multi(&[recipient.as_slice(), &truncate_u96(amount)])
}
