//! Claim and registry admin errors.

use shuffle_crypto::CryptoError;
use shuffle_ledger::LedgerError;
use shuffle_types::{Address, B256, U256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("only owner: {caller} is not the registry owner")]
    NotOwner { caller: Address },

    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] CryptoError),

    #[error("signer {signer} is not authorized")]
    UnauthorizedSigner { signer: Address },

    #[error("cast uint96 overflow: {amount}")]
    AmountOverflow { amount: U256 },

    #[error("claim ceiling exceeded for {recipient}: claimed {claimed} + requested {requested} > {ceiling}")]
    ClaimCeilingExceeded {
        recipient: Address,
        claimed: U256,
        requested: U256,
        ceiling: U256,
    },

    #[error("voucher {digest} already claimed")]
    VoucherAlreadyClaimed { digest: B256 },

    #[error("length mismatch: {signers} signers, {flags} flags")]
    LengthMismatch { signers: usize, flags: usize },

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
