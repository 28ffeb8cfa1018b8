//! Voucher-gated token claims.
//!
//! A trusted backend signs `(recipient, voted_amount)` vouchers. The
//! [`ClaimRegistry`] checks the signature against its signer set, enforces a
//! per-recipient ceiling and pays `voted_amount × ratio` tokens out of its own
//! ledger account. Each voucher redeems once, across every generation of a
//! chained migration.

pub mod error;
pub mod registry;
pub mod voucher;

pub use error::ClaimError;
pub use registry::{ClaimHistory, ClaimReceipt, ClaimRegistry};
pub use voucher::Voucher;
