//! The claim registry.
//!
//! Validation runs in a fixed order and stops at the first failure:
//!
//! 1. the voted amount must fit in 96 bits;
//! 2. the signature must recover to an authorized signer;
//! 3. `claimed + voted` must stay within the recipient's ceiling;
//! 4. the voucher digest must not be redeemed here or in any predecessor;
//! 5. the ledger transfer of `voted × ratio` must succeed.
//!
//! Only then are `claimed` and the redeemed set updated, so a rejected claim
//! leaves the registry and the ledger as they were.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use shuffle_crypto::{recover_signer, voucher_digest, RecoverableSignature};
use shuffle_ledger::{ShuffleToken, TransferReceipt};
use shuffle_types::{fits_u96, Address, ConfigError, TokenParams, B256, U256};
use shuffle_utils::StatsCounter;

use crate::error::ClaimError;
use crate::voucher::Voucher;

const STAT_NAMES: &[&str] = &["claims", "claims_rejected"];

/// Frozen claim state of a retired registry generation.
///
/// Read-only: a successor consults it for replay protection and reporting,
/// never for ceilings or signers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimHistory {
    claimed: HashMap<Address, U256>,
    redeemed: HashSet<B256>,
    predecessor: Option<Box<ClaimHistory>>,
}

impl ClaimHistory {
    /// Whether `digest` was redeemed in this generation or any earlier one.
    pub fn is_redeemed(&self, digest: &B256) -> bool {
        self.redeemed.contains(digest)
            || self
                .predecessor
                .as_ref()
                .is_some_and(|prev| prev.is_redeemed(digest))
    }

    /// Total voted amount `address` claimed across this and earlier
    /// generations.
    pub fn claimed_by(&self, address: &Address) -> U256 {
        let own = self.claimed.get(address).copied().unwrap_or(U256::ZERO);
        let earlier = self
            .predecessor
            .as_ref()
            .map_or(U256::ZERO, |prev| prev.claimed_by(address));
        own.saturating_add(earlier)
    }

    /// Number of generations, this one included.
    pub fn depth(&self) -> usize {
        1 + self.predecessor.as_ref().map_or(0, |prev| prev.depth())
    }
}

/// Result of a successful claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimReceipt {
    pub recipient: Address,
    pub voted_amount: U256,
    /// `voted_amount × ratio`, the gross amount sent through the ledger.
    pub tokens: U256,
    pub signer: Address,
    pub digest: B256,
    pub transfer: TransferReceipt,
}

#[derive(Clone, Debug)]
pub struct ClaimRegistry {
    owner: Address,
    /// The registry's own account on the ledger; claims are paid from it.
    address: Address,
    signers: HashSet<Address>,
    claimed: HashMap<Address, U256>,
    redeemed: HashSet<B256>,
    max_claimed: U256,
    custom_max_claimed: HashMap<Address, U256>,
    ratio: U256,
    predecessor: Option<ClaimHistory>,
    stats: StatsCounter,
}

impl ClaimRegistry {
    pub fn new(owner: Address, address: Address, params: &TokenParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            owner,
            address,
            signers: HashSet::new(),
            claimed: HashMap::new(),
            redeemed: HashSet::new(),
            max_claimed: U256::from(params.default_max_claimed),
            custom_max_claimed: HashMap::new(),
            ratio: U256::from(params.claim_ratio),
            predecessor: None,
            stats: StatsCounter::new(STAT_NAMES),
        })
    }

    /// A registry that continues from a retired generation.
    pub fn with_predecessor(
        owner: Address,
        address: Address,
        params: &TokenParams,
        history: ClaimHistory,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new(owner, address, params)?;
        registry.predecessor = Some(history);
        Ok(registry)
    }

    /// Retire this registry, keeping what a successor needs.
    pub fn into_history(self) -> ClaimHistory {
        ClaimHistory {
            claimed: self.claimed,
            redeemed: self.redeemed,
            predecessor: self.predecessor.map(Box::new),
        }
    }

    fn only_owner(&self, caller: &Address) -> Result<(), ClaimError> {
        if *caller != self.owner {
            return Err(ClaimError::NotOwner { caller: *caller });
        }
        Ok(())
    }

    // ── Claims ──────────────────────────────────────────────────────────

    /// Redeem a voucher for `recipient`.
    pub fn claim(
        &mut self,
        ledger: &mut ShuffleToken,
        recipient: Address,
        voted_amount: U256,
        signature: &RecoverableSignature,
    ) -> Result<ClaimReceipt, ClaimError> {
        match self.try_claim(ledger, recipient, voted_amount, signature) {
            Ok(receipt) => {
                self.stats.increment("claims");
                info!(
                    %recipient,
                    voted = %voted_amount,
                    tokens = %receipt.tokens,
                    signer = %receipt.signer,
                    "voucher claimed"
                );
                Ok(receipt)
            }
            Err(e) => {
                self.stats.increment("claims_rejected");
                warn!(%recipient, voted = %voted_amount, error = %e, "claim rejected");
                Err(e)
            }
        }
    }

    pub fn redeem(&mut self, ledger: &mut ShuffleToken, voucher: &Voucher) -> Result<ClaimReceipt, ClaimError> {
        self.claim(ledger, voucher.recipient, voucher.amount, &voucher.signature)
    }

    fn try_claim(
        &mut self,
        ledger: &mut ShuffleToken,
        recipient: Address,
        voted_amount: U256,
        signature: &RecoverableSignature,
    ) -> Result<ClaimReceipt, ClaimError> {
        if !fits_u96(voted_amount) {
            return Err(ClaimError::AmountOverflow { amount: voted_amount });
        }

        let digest = voucher_digest(&recipient, voted_amount);
        let signer = recover_signer(&digest, signature)?;
        if !self.signers.contains(&signer) {
            return Err(ClaimError::UnauthorizedSigner { signer });
        }

        let claimed = self.claimed_by(&recipient);
        let ceiling = self.ceiling_of(&recipient);
        let total = claimed
            .checked_add(voted_amount)
            .filter(|total| *total <= ceiling)
            .ok_or(ClaimError::ClaimCeilingExceeded {
                recipient,
                claimed,
                requested: voted_amount,
                ceiling,
            })?;

        if self.is_redeemed(&digest) {
            return Err(ClaimError::VoucherAlreadyClaimed { digest });
        }

        let tokens = voted_amount * self.ratio;
        let transfer = ledger.transfer(self.address, recipient, tokens)?;

        self.claimed.insert(recipient, total);
        self.redeemed.insert(digest);

        Ok(ClaimReceipt {
            recipient,
            voted_amount,
            tokens,
            signer,
            digest,
            transfer,
        })
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn ratio(&self) -> U256 {
        self.ratio
    }

    pub fn is_signer(&self, address: &Address) -> bool {
        self.signers.contains(address)
    }

    /// Voted amount `address` claimed in this generation.
    pub fn claimed_by(&self, address: &Address) -> U256 {
        self.claimed.get(address).copied().unwrap_or(U256::ZERO)
    }

    /// Voted amount `address` claimed in earlier generations.
    pub fn inherited_claimed(&self, address: &Address) -> U256 {
        self.predecessor
            .as_ref()
            .map_or(U256::ZERO, |history| history.claimed_by(address))
    }

    pub fn max_claimed(&self) -> U256 {
        self.max_claimed
    }

    /// Custom ceiling for `address` if one is set, the default otherwise.
    pub fn ceiling_of(&self, address: &Address) -> U256 {
        self.custom_max_claimed
            .get(address)
            .copied()
            .unwrap_or(self.max_claimed)
    }

    pub fn is_redeemed(&self, digest: &B256) -> bool {
        self.redeemed.contains(digest)
            || self
                .predecessor
                .as_ref()
                .is_some_and(|history| history.is_redeemed(digest))
    }

    pub fn predecessor(&self) -> Option<&ClaimHistory> {
        self.predecessor.as_ref()
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    // ── Admin ───────────────────────────────────────────────────────────

    pub fn set_signer(&mut self, caller: Address, signer: Address, authorized: bool) -> Result<(), ClaimError> {
        self.only_owner(&caller)?;
        self.apply_signer(signer, authorized);
        Ok(())
    }

    /// Toggle several signers at once; `signers` and `flags` pair up by
    /// position.
    pub fn set_signers(&mut self, caller: Address, signers: &[Address], flags: &[bool]) -> Result<(), ClaimError> {
        self.only_owner(&caller)?;
        if signers.len() != flags.len() {
            return Err(ClaimError::LengthMismatch {
                signers: signers.len(),
                flags: flags.len(),
            });
        }
        for (&signer, &authorized) in signers.iter().zip(flags) {
            self.apply_signer(signer, authorized);
        }
        Ok(())
    }

    fn apply_signer(&mut self, signer: Address, authorized: bool) {
        if authorized {
            self.signers.insert(signer);
        } else {
            self.signers.remove(&signer);
        }
        info!(%signer, authorized, "signer changed");
    }

    pub fn set_max_claimed_by(&mut self, caller: Address, max: U256) -> Result<(), ClaimError> {
        self.only_owner(&caller)?;
        self.max_claimed = max;
        info!(%max, "default claim ceiling changed");
        Ok(())
    }

    /// Override the ceiling for one address. Zero clears the override.
    pub fn set_custom_max_claimed_by(&mut self, caller: Address, address: Address, max: U256) -> Result<(), ClaimError> {
        self.only_owner(&caller)?;
        if max.is_zero() {
            self.custom_max_claimed.remove(&address);
        } else {
            self.custom_max_claimed.insert(address, max);
        }
        info!(%address, %max, "custom claim ceiling changed");
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<(), ClaimError> {
        self.only_owner(&caller)?;
        info!(previous = %self.owner, %new_owner, "registry ownership transferred");
        self.owner = new_owner;
        Ok(())
    }
}
