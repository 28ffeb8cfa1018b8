//! Cryptographic primitives for the Shuffle ledger.
//!
//! - **Keccak-256** for every digest (winner draws, vouchers, snapshots)
//! - **secp256k1** recoverable ECDSA for voucher signatures, Ethereum-style
//!   `r ‖ s ‖ v` encoding over the raw digest
//! - Address derivation: last 20 bytes of Keccak-256 of the uncompressed key

pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use error::CryptoError;
pub use hash::{keccak256, keccak256_multi, voucher_digest, winner_digest};
pub use keys::{address_of, SignerKey};
pub use sign::{recover_signer, sign_digest, RecoverableSignature};
