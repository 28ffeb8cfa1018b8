//! Fee engine for shuffling transfers.
//!
//! Every fee-paying transfer is charged two independent ceil-rounded 1% fees:
//! a burn that leaves the supply and a reward paid to a holder drawn from the
//! top-holder heap. The draw is a deterministic function of the sender, the
//! sender's nonce for the transfer's order of magnitude, and the heap layout.
//! It is predictable and can be influenced by whoever picks the amount.

pub mod engine;
pub mod nonce;

pub use engine::{FeeEngine, FeeOutcome, FeeSplit, WinnerRole};
pub use nonce::NonceBook;
