//! Ledger snapshots: the state of every funded account at a point in time.
//!
//! The snapshot hash is computed deterministically from balances, supply,
//! heap layout and nonces, so two ledgers that processed the same operations
//! produce the same hash. Accounts are sorted by address and heap entries are
//! kept in slot order.

use serde::{Deserialize, Serialize};

use shuffle_crypto::keccak256;
use shuffle_heap::HeapEntry;
use shuffle_types::{Address, B256, U256};

use crate::error::LedgerError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Keccak-256 over the remaining fields.
    pub hash: B256,
    pub total_supply: U256,
    pub total_burned: U256,
    pub accounts: Vec<AccountSnapshot>,
    /// Heap entries in slot order; index 0 is the root.
    pub heap: Vec<HeapEntry>,
    /// `(address, magnitude, nonce)` for every non-zero nonce.
    pub nonces: Vec<(Address, u32, u64)>,
    pub version: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub address: Address,
    pub balance: U256,
    /// 1-based heap slot, 0 when not resident.
    pub heap_index: usize,
}

impl LedgerSnapshot {
    pub fn create(
        accounts: Vec<AccountSnapshot>,
        total_supply: U256,
        total_burned: U256,
        heap: Vec<HeapEntry>,
        nonces: Vec<(Address, u32, u64)>,
    ) -> Self {
        let mut snap = Self {
            hash: B256::ZERO,
            total_supply,
            total_burned,
            accounts,
            heap,
            nonces,
            version: 1,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> B256 {
        let mut buf = Vec::with_capacity(
            64 + self.accounts.len() * 60 + self.heap.len() * 52 + self.nonces.len() * 32,
        );
        buf.extend_from_slice(&self.total_supply.to_be_bytes::<32>());
        buf.extend_from_slice(&self.total_burned.to_be_bytes::<32>());
        for account in &self.accounts {
            buf.extend_from_slice(account.address.as_slice());
            buf.extend_from_slice(&account.balance.to_be_bytes::<32>());
            buf.extend_from_slice(&(account.heap_index as u64).to_be_bytes());
        }
        for entry in &self.heap {
            buf.extend_from_slice(entry.address.as_slice());
            buf.extend_from_slice(&entry.balance.to_be_bytes::<32>());
        }
        for (address, magnitude, nonce) in &self.nonces {
            buf.extend_from_slice(address.as_slice());
            buf.extend_from_slice(&magnitude.to_be_bytes());
            buf.extend_from_slice(&nonce.to_be_bytes());
        }
        buf.extend_from_slice(&self.version.to_be_bytes());
        keccak256(&buf)
    }

    /// Check the stored hash against the contents.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Balances sum exactly to total supply.
    pub fn is_conserved(&self) -> bool {
        let held = self
            .accounts
            .iter()
            .try_fold(U256::ZERO, |sum, account| sum.checked_add(account.balance));
        held == Some(self.total_supply)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Snapshot(e.to_string()))
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}
