//! Ledger operation errors.

use shuffle_heap::HeapError;
use shuffle_types::{Address, U256};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("only owner: {caller} is not the ledger owner")]
    NotOwner { caller: Address },

    #[error("balance not enough: needed {needed}, available {available}")]
    InsufficientBalance { needed: U256, available: U256 },

    #[error("allowance not enough: needed {needed}, available {available}")]
    InsufficientAllowance { needed: U256, available: U256 },

    #[error("ledger already initialized")]
    AlreadyInitialized,

    #[error("snapshot decode failed: {0}")]
    Snapshot(String),

    #[error("heap error: {0}")]
    Heap(#[from] HeapError),
}
