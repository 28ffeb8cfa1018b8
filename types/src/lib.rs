//! Fundamental types for the Shuffle ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, 256-bit amounts and their integer helpers, and the
//! deployment parameters loaded from TOML.

pub mod amount;
pub mod error;
pub mod params;

pub use alloy_primitives::{Address, B256, U256};
pub use amount::{ceil_div, fits_u96, order_of_magnitude, tokens, truncate_u96, TOKEN_UNIT, U96_MAX};
pub use error::ConfigError;
pub use params::TokenParams;
