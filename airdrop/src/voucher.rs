//! Backend-side voucher construction.

use serde::{Deserialize, Serialize};

use shuffle_crypto::{recover_signer, sign_digest, voucher_digest, CryptoError, RecoverableSignature, SignerKey};
use shuffle_types::{fits_u96, Address, B256, U256};

use crate::error::ClaimError;

/// A signed entitlement: `recipient` may claim `amount` voted units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub recipient: Address,
    pub amount: U256,
    pub signature: RecoverableSignature,
}

impl Voucher {
    /// Sign a voucher. Amounts wider than 96 bits are refused rather than
    /// signed in truncated form.
    pub fn sign(recipient: Address, amount: U256, key: &SignerKey) -> Result<Self, ClaimError> {
        if !fits_u96(amount) {
            return Err(ClaimError::AmountOverflow { amount });
        }
        let signature = sign_digest(&voucher_digest(&recipient, amount), key)?;
        Ok(Self {
            recipient,
            amount,
            signature,
        })
    }

    /// `keccak256(recipient ‖ uint96(amount))`.
    pub fn digest(&self) -> B256 {
        voucher_digest(&self.recipient, self.amount)
    }

    pub fn signer(&self) -> Result<Address, CryptoError> {
        recover_signer(&self.digest(), &self.signature)
    }
}
