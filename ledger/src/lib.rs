//! Fee-shuffling token ledger.
//!
//! Balances and allowances follow ordinary ERC20 bookkeeping. Every
//! fee-paying transfer burns 1% of the amount and pays another 1% to a holder
//! drawn from the bounded top-holder heap, which the ledger keeps in sync with
//! balances on every mutation.

pub mod error;
pub mod snapshot;
pub mod token;

pub use error::LedgerError;
pub use snapshot::{AccountSnapshot, LedgerSnapshot};
pub use token::{ShuffleToken, TransferReceipt};
